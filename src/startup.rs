use crate::configuration::{DatabaseSettings, Settings, SiteSettings};
use crate::monitor::{LivenessMonitor, LivenessStatus, LogNotifier};
use crate::routes::{
    form_descriptor, health_check, list_feedback, liveness_status, submit_feedback,
};
use actix_web::{App, HttpServer, dev::Server, web};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use tokio::sync::watch;
use tracing_actix_web::TracingLogger;

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.connect_options())
}

/// `Application` works as a wrapper for actix_web `dev::Server`.
/// It was made because `dev::Server` does not tell us in which port the app
/// was allocated, so if we wrap it in a struct with the port alongside it, we
/// no longer have that issue. Why do we need to know the port? The tests do.
///
/// It also owns the liveness monitor, so the probe lives exactly as long as
/// the application it belongs to.
pub struct Application {
    port: u16,
    server: Server,
    monitor: LivenessMonitor,
}

impl Application {
    /// Given a configuration of type `Settings`:
    /// 1. A database connection pool is started (lazily, check
    ///    `get_connection_pool`)
    /// 2. The liveness monitor starts probing that pool
    /// 3. A server is started with `run`, which can be accessed using
    ///    `run_until_stopped`
    pub async fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let connection_pool = get_connection_pool(&configuration.database);

        let monitor = LivenessMonitor::spawn(
            connection_pool.clone(),
            LogNotifier,
            configuration.health_check,
        );

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr().unwrap().port();

        let server = run(
            listener,
            connection_pool,
            monitor.subscribe(),
            configuration.site,
        )?;
        Ok(Self {
            port,
            server,
            monitor,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Latest observation from the liveness monitor.
    pub fn liveness_status(&self) -> LivenessStatus {
        self.monitor.status()
    }

    /// This function only returns when the application is stopped.
    /// The liveness monitor is torn down on the way out.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    liveness: watch::Receiver<LivenessStatus>,
    site: SiteSettings,
) -> Result<Server, std::io::Error> {
    // web::Data wraps our state in an Arc<T>
    let db_pool = web::Data::new(db_pool);
    let liveness = web::Data::new(liveness);
    let site = web::Data::new(site);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(form_descriptor))
            .route("/health_check", web::get().to(health_check))
            .route("/status", web::get().to(liveness_status))
            .route("/feedback", web::post().to(submit_feedback))
            .route("/admin/feedback", web::get().to(list_feedback))
            .app_data(db_pool.clone())
            .app_data(liveness.clone())
            .app_data(site.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
