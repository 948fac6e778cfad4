pub mod m202601150001_create_courses;
pub mod m202601150002_create_sessions;
pub mod m202601150003_create_enrollments;
pub mod m202601150004_create_attendance_records;
pub mod m202601150005_create_scan_logs;
