//! Reading the trail finder form into a [`PreferenceSet`] and shaping the
//! proxy request from it.

use trailfinder_core::schema::TrailSuggestionRequest;

/// Checkbox group holding difficulty choices
pub const DIFFICULTY_GROUP: &str = "difficulty";

/// Checkbox group holding vibe choices
pub const VIBE_GROUP: &str = "vibe";

/// Anything that can report which checkboxes in a named group are checked.
pub trait CheckboxForm {
    /// Values of the checked inputs named `group`, in form order.
    fn checked_values(&self, group: &str) -> Vec<String>;
}

/// The checked inputs of a form as `(name, value)` pairs, as a browser would submit them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    checked: Vec<(String, String)>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a checked input.
    pub fn check(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.checked.push((name.into(), value.into()));
        self
    }
}

impl<N, V> FromIterator<(N, V)> for FormSnapshot
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            checked: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl CheckboxForm for FormSnapshot {
    fn checked_values(&self, group: &str) -> Vec<String> {
        self.checked
            .iter()
            .filter(|(name, _)| name == group)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

/// The difficulties and vibes picked for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSet {
    difficulties: Vec<String>,
    vibes: Vec<String>,
}

impl PreferenceSet {
    /// Builds a set, trimming values and dropping blanks and repeats.
    pub fn new<D, V>(difficulties: D, vibes: V) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        Self {
            difficulties: normalize(difficulties),
            vibes: normalize(vibes),
        }
    }

    pub fn difficulties(&self) -> &[String] {
        &self.difficulties
    }

    pub fn vibes(&self) -> &[String] {
        &self.vibes
    }

    /// True when nothing at all was selected.
    pub fn is_empty(&self) -> bool {
        self.difficulties.is_empty() && self.vibes.is_empty()
    }

    /// The model instruction for these preferences.
    pub fn to_prompt(&self) -> String {
        format!(
            "You are a creative trail guide for the Minto, Ontario area in Canada. \
             A hiker is looking for a trail with the following characteristics: \
             difficulty of {}, and vibes of {}. \
             Generate a single, plausible-sounding but fictional trail suggestion. \
             The trail should feel like it belongs in the Minto/Wellington County region. \
             Be creative and encouraging in your description. \
             Provide your response in JSON format according to the provided schema.",
            join_or_any(&self.difficulties),
            join_or_any(&self.vibes)
        )
    }

    /// The proxy request for these preferences.
    pub fn to_request(&self) -> TrailSuggestionRequest {
        TrailSuggestionRequest::new(self.to_prompt())
    }
}

/// Reads the `difficulty` and `vibe` groups of `form`.
pub fn collect<F: CheckboxForm + ?Sized>(form: &F) -> PreferenceSet {
    PreferenceSet::new(
        form.checked_values(DIFFICULTY_GROUP),
        form.checked_values(VIBE_GROUP),
    )
}

fn normalize<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        if !value.is_empty() && !out.iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}

fn join_or_any(values: &[String]) -> String {
    if values.is_empty() {
        "any".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailfinder_core::schema::SchemaDescriptor;

    #[test]
    fn test_collect_reads_both_groups() {
        let form = FormSnapshot::new()
            .check("difficulty", "Easy")
            .check("vibe", "Scenic")
            .check("newsletter", "yes")
            .check("difficulty", "Moderate");

        let prefs = collect(&form);
        assert_eq!(prefs.difficulties(), ["Easy", "Moderate"]);
        assert_eq!(prefs.vibes(), ["Scenic"]);
        assert!(!prefs.is_empty());
    }

    #[test]
    fn test_collect_empty_form() {
        let prefs = collect(&FormSnapshot::new());
        assert!(prefs.is_empty());
        assert!(prefs.difficulties().is_empty());
        assert!(prefs.vibes().is_empty());
    }

    #[test]
    fn test_normalizes_values() {
        let prefs = PreferenceSet::new(["Easy", " Easy ", ""], ["  "]);
        assert_eq!(prefs.difficulties(), ["Easy"]);
        assert!(prefs.vibes().is_empty());
    }

    #[test]
    fn test_prompt_with_missing_vibes() {
        let form: FormSnapshot = [("difficulty", "Easy")].into_iter().collect();
        let prompt = collect(&form).to_prompt();

        assert!(prompt.contains("difficulty of Easy"));
        assert!(prompt.contains("vibes of any"));
        assert!(prompt.starts_with("You are a creative trail guide for the Minto, Ontario area"));
    }

    #[test]
    fn test_prompt_joins_values() {
        let prefs = PreferenceSet::new(Vec::<String>::new(), ["Scenic", "Quiet & Peaceful"]);
        let prompt = prefs.to_prompt();
        assert!(prompt.contains("difficulty of any"));
        assert!(prompt.contains("vibes of Scenic, Quiet & Peaceful"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = PreferenceSet::new(["Challenging"], ["Forest"]);
        let b = PreferenceSet::new(["Challenging"], ["Forest"]);
        assert_eq!(a.to_request(), b.to_request());
    }

    #[test]
    fn test_request_uses_shared_schema() {
        let request = PreferenceSet::new(["Easy"], ["Riverside"]).to_request();
        assert_eq!(request.schema, SchemaDescriptor::trail_suggestion());
    }
}
