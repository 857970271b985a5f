use sqlx::PgPool;

use crate::auth::{AuthConfig, JwtService};
use crate::settlement::{SolanaConfig, SolanaSettlement};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    jwt_service: JwtService,
    settlement: Option<SolanaSettlement>,
    fiat_checkout_url: String,
}

impl AppState {
    pub fn new(db: PgPool) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let jwt_service = JwtService::new(&auth_config);
        // On-chain settlement is optional; without a platform wallet the
        // USDC strategy is simply disabled.
        let settlement = SolanaConfig::from_env().map(SolanaSettlement::new);
        let fiat_checkout_url = std::env::var("FIAT_CHECKOUT_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            db,
            jwt_service,
            settlement,
            fiat_checkout_url,
        })
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn settlement(&self) -> Option<&SolanaSettlement> {
        self.settlement.as_ref()
    }

    /// Swap in a settlement client; integration tests point this at a local
    /// stub RPC instead of going through the environment.
    pub fn with_settlement(mut self, settlement: SolanaSettlement) -> Self {
        self.settlement = Some(settlement);
        self
    }

    pub fn fiat_checkout_url(&self) -> &str {
        &self.fiat_checkout_url
    }
}
