use std::sync::Arc;

use tracing::info;

use crate::{auth, config::Config, database::Database, mail::Mailer};

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub mailer: Option<Mailer>,
    /// Hash verified against when a login names an unknown user, so the
    /// failure path costs the same as a wrong password.
    pub decoy_hash: String,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();

        let db = Database::open(&config.database_path).expect("Failed to open database");

        let seed_hash =
            auth::hash_password(&config.admin_password).expect("Failed to hash admin password");
        if db
            .seed_admin("admin", &seed_hash)
            .expect("Failed to seed admin credential")
        {
            info!("Seeded admin credential");
        }

        std::fs::create_dir_all(&config.uploads_dir).expect("Failed to create uploads directory");

        let mailer = Mailer::from_config(&config);
        let decoy_hash = auth::hash_password("decoy").expect("Failed to hash decoy password");

        Arc::new(Self {
            config,
            db,
            mailer,
            decoy_hash,
        })
    }
}
