// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Schedules ---
        handlers::schedule::create_schedule,
        handlers::schedule::create_recurring,
        handlers::schedule::update_schedule,
        handlers::schedule::delete_schedule,
        handlers::schedule::get_tutor_schedules,
        handlers::schedule::get_available_schedules,

        // --- Bookings ---
        handlers::booking::create_booking,
        handlers::booking::list_bookings,
        handlers::booking::get_booking,
        handlers::booking::update_booking_status,

        // --- Reviews ---
        handlers::review::add_review,
        handlers::review::get_review,
        handlers::review::update_review,

        // --- Payments ---
        handlers::payment::create_payment,
        handlers::payment::get_payment_quote,
        handlers::payment::process_payment,
        handlers::payment::payment_history,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Schedules ---
            models::schedule::Schedule,
            models::schedule::ScheduleWithBooking,
            models::schedule::RecurringOutcome,

            // --- Bookings ---
            models::booking::BookingStatus,
            models::booking::Booking,
            models::booking::BookingDetail,
            models::booking::BookingListItem,

            // --- Reviews ---
            models::review::Review,
            models::review::ReviewWithEditability,

            // --- Payments ---
            models::payment::PaymentMethod,
            models::payment::PaymentStatus,
            models::payment::Payment,
            models::payment::PaymentQuote,
            models::payment::PaymentHistoryEntry,

            // --- Tutors ---
            models::tutor::Tutor,

            // --- Dashboard ---
            models::dashboard::BookingSummary,

            // --- Payloads ---
            handlers::schedule::CreateSchedulePayload,
            handlers::schedule::CreateRecurringPayload,
            handlers::booking::CreateBookingPayload,
            handlers::booking::UpdateStatusPayload,
            handlers::review::ReviewPayload,
            handlers::payment::CreatePaymentPayload,
        )
    ),
    tags(
        (name = "Schedules", description = "Agenda do tutor e disponibilidade"),
        (name = "Bookings", description = "Reservas e máquina de estados"),
        (name = "Reviews", description = "Avaliações com janela de edição de 24h"),
        (name = "Payments", description = "Pagamentos (valor derivado, gateway simulado)"),
        (name = "Dashboard", description = "Indicadores de reservas")
    )
)]
pub struct ApiDoc;
