use serde::{Deserialize, Serialize};

/// Restricts retrieval to a set of lesson IDs.
///
/// Serializes to the vector store's metadata filter syntax, e.g.
/// `{"id": {"$in": ["1001", "1002"]}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonFilter {
    id: IdMembership,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct IdMembership {
    #[serde(rename = "$in")]
    ids: Vec<String>,
}

impl LessonFilter {
    /// Builds a filter from the lesson IDs of a request. An empty
    /// list means retrieval is unrestricted so there is no filter.
    pub fn from_lesson_ids(lesson_ids: &[String]) -> Option<Self> {
        if lesson_ids.is_empty() {
            return None;
        }
        Some(Self {
            id: IdMembership {
                ids: lesson_ids.to_vec(),
            },
        })
    }

    pub fn ids(&self) -> &[String] {
        &self.id.ids
    }

    pub fn matches(&self, lesson_id: &str) -> bool {
        self.id.ids.iter().any(|id| id == lesson_id)
    }
}
