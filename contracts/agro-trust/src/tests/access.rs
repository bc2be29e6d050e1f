#![cfg(test)]

use soroban_sdk::{testutils::Address as _, Address};

use super::utils::{create_test_batch, s, setup_test_env};
use crate::ContractError;

#[test]
fn test_owner_is_authorized_by_default() {
    let ctx = setup_test_env();

    assert_eq!(ctx.client.get_owner(), ctx.owner);
    assert!(ctx.client.is_authorized(&ctx.owner));
}

#[test]
fn test_owner_can_authorize_and_revoke_users() {
    let ctx = setup_test_env();
    let processor = Address::generate(&ctx.env);

    assert!(!ctx.client.is_authorized(&processor));

    ctx.client.authorize_user(&ctx.owner, &processor);
    assert!(ctx.client.is_authorized(&processor));

    ctx.client.revoke_user(&ctx.owner, &processor);
    assert!(!ctx.client.is_authorized(&processor));
}

#[test]
fn test_non_owner_cannot_manage_allowlist() {
    let ctx = setup_test_env();
    let intruder = Address::generate(&ctx.env);
    let target = Address::generate(&ctx.env);

    let result = ctx.client.try_authorize_user(&intruder, &target);
    assert_eq!(result, Err(Ok(ContractError::OnlyOwner)));

    // Being on the allowlist does not grant allowlist management.
    ctx.client.authorize_user(&ctx.owner, &intruder);
    let result = ctx.client.try_authorize_user(&intruder, &target);
    assert_eq!(result, Err(Ok(ContractError::OnlyOwner)));

    let result = ctx.client.try_revoke_user(&intruder, &ctx.owner);
    assert_eq!(result, Err(Ok(ContractError::OnlyOwner)));
    assert!(!ctx.client.is_authorized(&target));
}

#[test]
fn test_owner_cannot_be_revoked() {
    let ctx = setup_test_env();

    let result = ctx.client.try_revoke_user(&ctx.owner, &ctx.owner);
    assert_eq!(result, Err(Ok(ContractError::CannotRevokeOwner)));
    assert!(ctx.client.is_authorized(&ctx.owner));
}

#[test]
fn test_unlisted_caller_fails_every_mutation() {
    let ctx = setup_test_env();
    let stranger = Address::generate(&ctx.env);
    let batch_id = create_test_batch(&ctx, "TURMERIC2025");
    let env = &ctx.env;

    assert_eq!(
        ctx.client.try_create_batch(
            &stranger,
            &s(env, "CLOVE2025"),
            &s(env, "Clove"),
            &s(env, "Kanyakumari Clove"),
            &s(env, "Kanyakumari, Tamil Nadu"),
            &1735689600u64,
        ),
        Err(Ok(ContractError::NotAuthorized))
    );
    assert_eq!(
        ctx.client.try_add_farmer_info(
            &stranger,
            &batch_id,
            &s(env, "Ravi Kumar"),
            &s(env, "Bhavani, Erode"),
            &s(env, "+91-9876543210"),
            &s(env, "FARMER001"),
        ),
        Err(Ok(ContractError::NotAuthorized))
    );
    assert_eq!(
        ctx.client.try_add_cultivation_details(
            &stranger,
            &batch_id,
            &s(env, "Loamy"),
            &s(env, "Drip"),
            &s(env, "Organic Neem Spray"),
            &1725321600u64,
            &10000u64,
        ),
        Err(Ok(ContractError::NotAuthorized))
    );
    assert_eq!(
        ctx.client.try_add_processing_info(
            &stranger,
            &batch_id,
            &s(env, "Erode Processing Unit"),
            &s(env, "Traditional Drying"),
            &1736294400u64,
            &s(env, "PROC001"),
        ),
        Err(Ok(ContractError::NotAuthorized))
    );
    assert_eq!(
        ctx.client.try_add_lab_result(
            &stranger,
            &batch_id,
            &s(env, "Food Safety Lab"),
            &s(env, "Passed"),
            &1736899200u64,
            &s(env, "QmHash123456789"),
        ),
        Err(Ok(ContractError::NotAuthorized))
    );
    assert_eq!(
        ctx.client.try_add_certificate(
            &stranger,
            &batch_id,
            &s(env, "GI Registry Office"),
            &s(env, "Geographical Indication"),
            &1737504000u64,
            &s(env, "GI2025001"),
        ),
        Err(Ok(ContractError::NotAuthorized))
    );
    assert_eq!(
        ctx.client.try_add_transfer_record(
            &stranger,
            &batch_id,
            &s(env, "Farmer"),
            &s(env, "Processor"),
            &s(env, "Processing"),
            &1737504000u64,
        ),
        Err(Ok(ContractError::NotAuthorized))
    );
    assert_eq!(
        ctx.client.try_add_trace_data(
            &stranger,
            &batch_id,
            &s(env, "Ready for retail"),
            &s(env, "QrCodeHash123"),
        ),
        Err(Ok(ContractError::NotAuthorized))
    );

    assert!(!ctx.client.get_farmer_info(&batch_id).exists);
    assert_eq!(ctx.client.get_transfer_record_count(&batch_id), 0);
}

#[test]
fn test_authorized_user_can_write_until_revoked() {
    let ctx = setup_test_env();
    let lab = Address::generate(&ctx.env);
    let batch_id = create_test_batch(&ctx, "TURMERIC2025");
    let env = &ctx.env;

    ctx.client.authorize_user(&ctx.owner, &lab);
    ctx.client.add_lab_result(
        &lab,
        &batch_id,
        &s(env, "Food Safety Lab"),
        &s(env, "Passed"),
        &1736899200u64,
        &s(env, "QmHash123456789"),
    );
    assert!(ctx.client.get_lab_result(&batch_id).exists);

    ctx.client.revoke_user(&ctx.owner, &lab);
    let result = ctx.client.try_add_lab_result(
        &lab,
        &batch_id,
        &s(env, "Food Safety Lab"),
        &s(env, "Failed"),
        &1736985600u64,
        &s(env, "QmHash987654321"),
    );
    assert_eq!(result, Err(Ok(ContractError::NotAuthorized)));

    // The earlier write is untouched.
    assert_eq!(ctx.client.get_lab_result(&batch_id).result, s(env, "Passed"));
}
