#![forbid(unsafe_code)]

//! Carousel options read from an element's `data-*` attributes.
//!
//! ```html
//! <div class="glissade" data-rate="0.4" data-auto-slide="true"
//!      data-delay-between-slides="3000"> ... </div>
//! ```

use glissade_core::{CarouselConfig, ConfigError};

/// Data attributes the adapter reads, with the option key each maps to.
pub const OPTION_ATTRIBUTES: [(&str, &str); 3] = [
    ("data-rate", "rate"),
    ("data-auto-slide", "autoSlide"),
    ("data-delay-between-slides", "delayBetweenSlides"),
];

/// Build a config from attribute lookups.
///
/// `lookup` receives each name in [`OPTION_ATTRIBUTES`] and returns the
/// attribute value if present.
pub fn config_from_attributes<F>(mut lookup: F) -> Result<CarouselConfig, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    let present: Vec<(&'static str, String)> = OPTION_ATTRIBUTES
        .iter()
        .filter_map(|&(attr, key)| lookup(attr).map(|value| (key, value)))
        .collect();
    CarouselConfig::from_attributes(present.iter().map(|(k, v)| (*k, v.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(attrs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = attrs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn no_attributes_yields_defaults() {
        let config = config_from_attributes(lookup(&[])).expect("defaults are valid");
        assert_eq!(config, CarouselConfig::default());
    }

    #[test]
    fn all_attributes_are_read() {
        let config = config_from_attributes(lookup(&[
            ("data-rate", "0.4"),
            ("data-auto-slide", "true"),
            ("data-delay-between-slides", "3000"),
        ]))
        .expect("valid attributes");
        assert_eq!(
            config,
            CarouselConfig::default()
                .with_rate(0.4)
                .with_auto_slide(true)
                .with_delay_between_slides(3000)
        );
    }

    #[test]
    fn presence_only_auto_slide_is_off() {
        let config = config_from_attributes(lookup(&[("data-auto-slide", "")]))
            .expect("valid attributes");
        assert!(!config.auto_slide);
    }

    #[test]
    fn out_of_range_attributes_use_defaults() {
        let config = config_from_attributes(lookup(&[
            ("data-rate", "-1"),
            ("data-delay-between-slides", "0"),
        ]))
        .expect("range problems do not fail construction");
        assert_eq!(config, CarouselConfig::default());
    }

    #[test]
    fn bad_delay_is_an_error() {
        let err = config_from_attributes(lookup(&[("data-delay-between-slides", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("delayBetweenSlides"));
    }
}
