//! Lesson records and the upsert operation.
mod filter;
pub use filter::LessonFilter;

mod record;
pub use record::{
    CONTENT_KEY, ID_KEY, LAST_UPDATED_KEY, LessonRecord, build_metadata, clean_content,
    generate_lesson_id,
};

mod upsert;
pub use upsert::{NewLesson, upsert_lesson};
