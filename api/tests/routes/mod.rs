mod attendance_test;
mod courses_test;
mod health_test;
mod sessions_test;
