//! Shared rejection rule and interpretation phrasing for hypothesis tests.

use crate::effect_size::EffectSizeLabel;

/// Formats a p-value for interpretation text.
fn format_p(p_value: f64) -> String {
    if p_value < 1e-4 {
        "p < 0.0001".to_string()
    } else {
        format!("p = {p_value:.4}")
    }
}

/// Applies `reject_null = p_value < alpha` and phrases the outcome.
///
/// # Examples
/// ```
/// use u_statengine::effect_size::EffectSizeLabel;
/// use u_statengine::inferential::decide;
///
/// let (reject, text) = decide(0.0012, 0.05, Some(EffectSizeLabel::Large));
/// assert!(reject);
/// assert_eq!(
///     text,
///     "Reject the null hypothesis at alpha = 0.05 (p = 0.0012); the effect size is large."
/// );
/// ```
pub fn decide(p_value: f64, alpha: f64, effect: Option<EffectSizeLabel>) -> (bool, String) {
    let reject_null = p_value < alpha;
    let verdict = if reject_null {
        "Reject the null hypothesis"
    } else {
        "Fail to reject the null hypothesis"
    };
    let mut text = format!("{verdict} at alpha = {alpha} ({})", format_p(p_value));
    match effect {
        Some(label) => text.push_str(&format!("; the effect size is {label}.")),
        None => text.push('.'),
    }
    (reject_null, text)
}
