use ideas_db::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// Body shared by the bootstrap records.
pub const FIXTURE_BODY: &str = "Lorem ipsum…";

/// An idea record. Both attributes are free text with no validation; either
/// may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Idea {
    /// Store-assigned identity, `None` until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Title of the idea
    #[serde(default)]
    pub title: Option<String>,
    /// Body text of the idea
    #[serde(default)]
    pub body: Option<String>,
}

impl Idea {
    /// Unsaved draft built from the two input fields.
    pub fn new(title: Option<String>, body: Option<String>) -> Self {
        Self {
            id: None,
            title,
            body,
        }
    }

    /// Bootstrap records shown when no external store is configured.
    pub fn fixtures() -> Vec<Idea> {
        vec![
            Idea {
                id: Some(RecordId::new(1)),
                title: Some("First Idea".to_string()),
                body: Some(FIXTURE_BODY.to_string()),
            },
            Idea {
                id: Some(RecordId::new(2)),
                title: Some("Second Idea".to_string()),
                body: Some(FIXTURE_BODY.to_string()),
            },
        ]
    }

    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

impl Record for Idea {
    const KIND: &'static str = "idea";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
}
