use crate::storage::RecordKind;
use soroban_sdk::{contracttype, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchCreatedEvent {
    pub batch_id: String,
    pub creator: Address,
    pub crop_name: String,
    pub variety: String,
    pub harvest_date: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAddedEvent {
    pub batch_id: String,
    pub kind: RecordKind,
    pub actor: Address,
    pub amended: bool,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRecordedEvent {
    pub batch_id: String,
    pub actor: Address,
    pub from: String,
    pub to: String,
    pub index: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessChangedEvent {
    pub owner: Address,
    pub user: Address,
    pub authorized: bool,
    pub timestamp: u64,
}

pub fn emit_batch_created(
    env: &Env,
    batch_id: String,
    creator: Address,
    crop_name: String,
    variety: String,
    harvest_date: u64,
) {
    let event = BatchCreatedEvent {
        batch_id,
        creator,
        crop_name,
        variety,
        harvest_date,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(("batch_created",), event);
}

pub fn emit_record_added(
    env: &Env,
    batch_id: String,
    kind: RecordKind,
    actor: Address,
    amended: bool,
) {
    let event = RecordAddedEvent {
        batch_id,
        kind,
        actor,
        amended,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(("record_added",), event);
}

pub fn emit_transfer_recorded(
    env: &Env,
    batch_id: String,
    actor: Address,
    from: String,
    to: String,
    index: u32,
) {
    let event = TransferRecordedEvent {
        batch_id,
        actor,
        from,
        to,
        index,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(("transfer_recorded",), event);
}

pub fn emit_access_changed(env: &Env, owner: Address, user: Address, authorized: bool) {
    let topic = if authorized { "user_authorized" } else { "user_revoked" };
    let event = AccessChangedEvent {
        owner,
        user,
        authorized,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish((topic,), event);
}
