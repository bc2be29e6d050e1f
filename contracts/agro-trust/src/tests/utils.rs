#![cfg(test)]

use soroban_sdk::{testutils::Address as _, Address, Env, String};

use crate::{AgroTrust, AgroTrustClient};

pub struct TestContext {
    pub env: Env,
    pub client: AgroTrustClient<'static>,
    pub owner: Address,
}

/// Initialized contract with all auths mocked; the allowlist is still enforced.
pub fn setup_test_env() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(AgroTrust, ());
    let client = AgroTrustClient::new(&env, &contract_id);
    let owner = Address::generate(&env);

    client.initialize(&owner);

    TestContext { env, client, owner }
}

pub fn s(env: &Env, value: &str) -> String {
    String::from_str(env, value)
}

/// Creates a turmeric batch as the owner.
pub fn create_test_batch(ctx: &TestContext, batch_id: &str) -> String {
    let id = s(&ctx.env, batch_id);
    ctx.client.create_batch(
        &ctx.owner,
        &id,
        &s(&ctx.env, "Turmeric"),
        &s(&ctx.env, "Erode Manjal"),
        &s(&ctx.env, "Erode, Tamil Nadu"),
        &1735689600u64,
    );
    id
}
