use sea_orm::DatabaseConnection;
use services::{
    AttendanceFeed, AttendanceLedger, CheckInPolicy, CheckInValidator, CourseService, EnrollmentManager,
    GeminiReportGenerator, ReportGenerator, SessionRegistry,
};
use std::sync::Arc;

/// Everything a handler needs, built once at start-up and cloned per request.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    feed: AttendanceFeed,
    pub sessions: SessionRegistry,
    pub check_in: CheckInValidator,
    pub enrollment: EnrollmentManager,
    pub courses: CourseService,
    pub ledger: AttendanceLedger,
    pub reports: Arc<dyn ReportGenerator>,
}

impl AppState {
    /// Wires the services from the global configuration.
    pub fn new(db: DatabaseConnection) -> Self {
        let feed = AttendanceFeed::new();
        Self {
            sessions: SessionRegistry::new(db.clone()),
            check_in: CheckInValidator::new(db.clone()).with_feed(feed.clone()),
            enrollment: EnrollmentManager::new(db.clone()),
            courses: CourseService::new(db.clone()),
            ledger: AttendanceLedger::new(db.clone()),
            reports: Arc::new(GeminiReportGenerator::from_config()),
            feed,
            db,
        }
    }

    pub fn with_check_in_policy(mut self, policy: CheckInPolicy) -> Self {
        self.check_in = self.check_in.with_policy(policy);
        self
    }

    pub fn with_report_generator(mut self, generator: Arc<dyn ReportGenerator>) -> Self {
        self.reports = generator;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn feed(&self) -> &AttendanceFeed {
        &self.feed
    }
}
