//! Photo variant selection

use super::event::PhotoVariant;

/// Pick the photo variant to send to OCR.
///
/// Telegram lists photo sizes in ascending resolution, so the last entry is the
/// largest. Dimensions are not compared; if the platform ever breaks that
/// ordering the wrong variant is chosen.
#[must_use]
pub fn pick_best_photo(variants: &[PhotoVariant]) -> Option<&PhotoVariant> {
    variants.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, width: u32) -> PhotoVariant {
        PhotoVariant {
            file_id: id.to_string(),
            width,
            height: width,
            file_size: u64::from(width) * 10,
        }
    }

    #[test]
    fn single_variant() {
        let variants = vec![variant("only", 90)];
        assert_eq!(pick_best_photo(&variants), Some(&variants[0]));
    }

    #[test]
    fn two_variants() {
        let variants = vec![variant("a", 90), variant("b", 320)];
        assert_eq!(pick_best_photo(&variants).unwrap().file_id, "b");
    }

    #[test]
    fn many_variants_returns_last() {
        let variants = vec![variant("a", 90), variant("b", 320), variant("c", 800)];
        assert_eq!(pick_best_photo(&variants).unwrap().width, 800);
    }

    #[test]
    fn ordering_is_trusted_not_verified() {
        let variants = vec![variant("big", 1280), variant("small", 90)];
        assert_eq!(pick_best_photo(&variants).unwrap().file_id, "small");
    }

    #[test]
    fn empty_list_yields_none() {
        assert!(pick_best_photo(&[]).is_none());
    }
}
