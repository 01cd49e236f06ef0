pub mod schedule_service;
pub use schedule_service::ScheduleService;
pub mod booking_service;
pub use booking_service::BookingService;
pub mod review_service;
pub use review_service::ReviewService;
pub mod payment_service;
pub use payment_service::PaymentService;
