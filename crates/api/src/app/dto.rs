/// Body of `POST /submit`.
///
/// `name` stays optional here; deciding what an absent or empty name means
/// belongs to `EntryName::parse`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SubmitForm {
    pub name: Option<String>,
}

impl SubmitForm {
    /// Build from decoded `key=value` pairs. A repeated `name` keeps the first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let name = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "name").then_some(value));
        Self { name }
    }
}
