//! Templates compiled into the binary for the bundled generators.

/// `(tag, template source)` for every bundled generator.
pub(crate) const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "gen_calibration_v5_h",
        include_str!("../../templates/gen_calibration_v5_h.tera"),
    ),
    (
        "gen_calibration_v5_c",
        include_str!("../../templates/gen_calibration_v5_c.tera"),
    ),
    (
        "gen_cal_v5_c_example",
        include_str!("../../templates/gen_cal_v5_c_example.tera"),
    ),
    (
        "gen_calibration_v5_shim",
        include_str!("../../templates/gen_calibration_v5_shim.tera"),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BUILTIN_TAGS;

    #[test]
    fn test_every_builtin_tag_has_a_template() {
        for tag in BUILTIN_TAGS {
            assert!(
                BUILTIN_TEMPLATES.iter().any(|(name, _)| name == tag),
                "no bundled template for {tag}"
            );
        }
    }
}
