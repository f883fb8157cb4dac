pub mod aborting_join_handle;
#[cfg(test)]
pub mod fake_embedded_content;
pub mod time_source;
