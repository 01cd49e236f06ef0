//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Agenda do tutor: criação (única e recorrente), edição e remoção
    let schedule_routes = Router::new()
        .route("/", post(handlers::schedule::create_schedule))
        .route("/recurring", post(handlers::schedule::create_recurring))
        .route(
            "/{schedule_id}",
            put(handlers::schedule::update_schedule).delete(handlers::schedule::delete_schedule),
        );

    // Consulta da agenda por tutor (a lista completa é do próprio tutor;
    // a lista de livres é pública para os alunos navegarem)
    let tutor_schedule_routes = Router::new()
        .route(
            "/{tutor_id}/schedules",
            get(handlers::schedule::get_tutor_schedules),
        )
        .route(
            "/{tutor_id}/schedules/available",
            get(handlers::schedule::get_available_schedules),
        );

    let booking_routes = Router::new()
        .route(
            "/",
            post(handlers::booking::create_booking).get(handlers::booking::list_bookings),
        )
        .route("/{booking_id}", get(handlers::booking::get_booking))
        .route(
            "/{booking_id}/status",
            axum::routing::patch(handlers::booking::update_booking_status),
        )
        .route(
            "/{booking_id}/review",
            post(handlers::review::add_review).get(handlers::review::get_review),
        )
        .route(
            "/{booking_id}/payment",
            post(handlers::payment::create_payment).get(handlers::payment::get_payment_quote),
        );

    let review_routes = Router::new().route("/{review_id}", put(handlers::review::update_review));

    let payment_routes = Router::new()
        .route("/", get(handlers::payment::payment_history))
        .route(
            "/{payment_id}/process",
            post(handlers::payment::process_payment),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/dashboard/summary",
            get(handlers::dashboard::get_summary),
        )
        .nest("/api/schedules", schedule_routes)
        .nest("/api/tutors", tutor_schedule_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/reviews", review_routes)
        .nest("/api/payments", payment_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
