pub mod app;
pub mod ws;

pub use app::{
    TestApp, create_course, make_test_app, running_session, send, start_session, student, teacher,
};
pub use ws::{connect_ws, spawn_server};
