//! Application layer for MentorBuddy.
//!
//! Screen-level use cases built on the core services: account flows,
//! the dashboard, exam paper generation, route strings, and the
//! [`AppContext`] that wires them to storage and the text generator.

pub mod auth_usecase;
pub mod context;
pub mod countries;
pub mod dashboard;
pub mod exam_paper_service;
pub mod navigation;

pub use auth_usecase::{AuthStatus, AuthUseCase, FormErrors, SignupForm};
pub use context::{AppContext, Bootstrap};
pub use dashboard::{DashboardView, DrawerItem, SubjectDraft};
pub use exam_paper_service::ExamPaperService;
pub use navigation::{Route, RouteRequest, build_route, parse_route};
