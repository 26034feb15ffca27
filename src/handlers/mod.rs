// handlers/mod.rs - two security tiers
//
// public:    no authentication (liveness, health)
// protected: bearer token required (/api/*), gated by middleware::auth

pub mod protected;
pub mod public;
