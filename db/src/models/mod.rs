pub mod attendance_record;
pub mod course;
pub mod enrollment;
pub mod scan_log;
pub mod session;

pub use attendance_record::Entity as AttendanceRecord;
pub use course::Entity as Course;
pub use enrollment::Entity as Enrollment;
pub use scan_log::Entity as ScanLog;
pub use session::Entity as Session;
