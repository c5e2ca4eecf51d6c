/// Latest advisory strings from the endpoint. Replaced wholesale on every
/// accepted sample; nothing is merged or kept from earlier polls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecommendationStore {
    items: Vec<String>,
}
impl RecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn replace(&mut self, list: Vec<String>) {
        self.items = list;
    }
    pub fn items(&self) -> &[String] {
        &self.items
    }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn replace_overwrites_instead_of_merging() {
        let mut store = RecommendationStore::new();
        store.replace(vec!["Irrigate".into(), "Add compost".into()]);
        store.replace(vec!["Irrigate".into()]);
        assert_eq!(store.items(), ["Irrigate"]);
    }
    #[test]
    fn empty_list_clears_previous_advice() {
        let mut store = RecommendationStore::new();
        store.replace(vec!["Irrigate".into()]);
        store.replace(Vec::new());
        assert!(store.is_empty());
    }
    #[test]
    fn keeps_duplicates_and_source_order() {
        let mut store = RecommendationStore::new();
        store.replace(vec!["b".into(), "a".into(), "b".into()]);
        assert_eq!(store.items(), ["b", "a", "b"]);
    }
}
