pub mod admin_service;
pub mod ai_service;
pub mod content_service;
pub mod http;
pub mod notification_service;
pub mod ports;
