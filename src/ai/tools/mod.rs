pub mod lesson_search;
pub use lesson_search::{LESSON_SEARCH_TOOL_NAME, LessonRetrieval, LessonSearchTool};
