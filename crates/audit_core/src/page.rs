use serde::{Deserialize, Deserializer, Serialize};

use crate::ValidationError;

/// One extracted page as returned by upload or fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl PageRecord {
    pub fn new(url: impl Into<String>, lang: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lang: lang.into(),
            content: content.into(),
        }
    }
}

pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ordered page collection owned by one workflow.
///
/// The collection is only ever replaced as a whole; the one in-place
/// mutation is editing a record's content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageStore {
    pages: Vec<PageRecord>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, pages: Vec<PageRecord>) {
        self.pages = pages;
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn as_slice(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn get(&self, index: usize) -> Option<&PageRecord> {
        self.pages.get(index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn snapshot(&self) -> Vec<PageRecord> {
        self.pages.clone()
    }

    pub fn edit_content(&mut self, index: usize, content: String) -> Result<(), ValidationError> {
        let len = self.pages.len();
        let page = self
            .pages
            .get_mut(index)
            .ok_or(ValidationError::PageOutOfRange { index, len })?;
        page.content = content;
        Ok(())
    }
}
