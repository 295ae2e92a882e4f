//! Conversation membership tests.

use confab::{ChatService, ChatStore, CreateConversationInput, MemoryStore, User, UserId};
use std::sync::Arc;

fn setup() -> (Arc<MemoryStore>, ChatService) {
    let store = Arc::new(MemoryStore::new());
    let chat = ChatService::new(store.clone());
    (store, chat)
}

fn seed_user(store: &MemoryStore, id: &str) -> UserId {
    let user = User {
        id: UserId::from(id),
        email: format!("{id}@example.com"),
        password: "secret".to_string(),
        username: id.to_string(),
        display_name: id.to_uppercase(),
        profile_picture: None,
    };
    store.create_user(&user).unwrap();
    user.id
}

fn titled(title: &str, member_ids: &[&UserId]) -> CreateConversationInput {
    CreateConversationInput {
        title: title.to_string(),
        member_ids: member_ids.iter().map(|id| (*id).clone()).collect(),
    }
}

fn member_ids(chat: &ChatService, room: &confab::ConversationId) -> Vec<UserId> {
    chat.get_conversation(room)
        .unwrap()
        .members
        .into_iter()
        .map(|m| m.id)
        .collect()
}

// --- Creation Membership Tests ---

#[test]
fn test_requester_in_list_included_once() {
    let (store, chat) = setup();
    let a = seed_user(&store, "a");
    let b = seed_user(&store, "b");

    let room = chat.create_conversation(&a, titled("Pair", &[&a, &b])).unwrap();

    let ids: Vec<_> = room.members.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn test_requester_not_in_list_appended_last() {
    let (store, chat) = setup();
    let a = seed_user(&store, "a");
    let b = seed_user(&store, "b");
    let c = seed_user(&store, "c");

    let room = chat.create_conversation(&a, titled("Trio", &[&b, &c])).unwrap();

    let ids: Vec<_> = room.members.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, vec![b, c, a]);
}

#[test]
fn test_duplicate_member_ids_collapse() {
    let (store, chat) = setup();
    let a = seed_user(&store, "a");
    let b = seed_user(&store, "b");

    let room = chat
        .create_conversation(&a, titled("Echo", &[&b, &b, &b]))
        .unwrap();

    let ids: Vec<_> = room.members.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, vec![b, a]);
}

#[test]
fn test_unknown_member_ids_skipped() {
    let (store, chat) = setup();
    let a = seed_user(&store, "a");
    let ghost = UserId::from("ghost");

    let room = chat
        .create_conversation(&a, titled("Haunted", &[&ghost]))
        .unwrap();

    assert_eq!(room.members.len(), 1);
    assert_eq!(room.members[0].id, a);
}

// --- Mutation Idempotence Tests ---

#[test]
fn test_add_existing_member_is_noop() {
    let (store, chat) = setup();
    let a = seed_user(&store, "a");
    let b = seed_user(&store, "b");
    let room = chat.create_conversation(&a, titled("Pair", &[&b])).unwrap();

    let before = member_ids(&chat, &room.id);
    let unchanged = chat.add_member(&room.id, &b).unwrap();

    assert_eq!(
        unchanged.members.iter().map(|m| m.id.clone()).collect::<Vec<_>>(),
        before
    );
}

#[test]
fn test_remove_absent_member_is_noop() {
    let (store, chat) = setup();
    let a = seed_user(&store, "a");
    let b = seed_user(&store, "b");
    let room = chat.create_conversation(&a, titled("Solo", &[])).unwrap();

    let before = member_ids(&chat, &room.id);
    let unchanged = chat.remove_member(&room.id, &b).unwrap();

    assert_eq!(
        unchanged.members.iter().map(|m| m.id.clone()).collect::<Vec<_>>(),
        before
    );
}

#[test]
fn test_add_then_remove_roundtrip() {
    let (store, chat) = setup();
    let a = seed_user(&store, "a");
    let b = seed_user(&store, "b");
    let room = chat.create_conversation(&a, titled("Door", &[])).unwrap();

    chat.add_member(&room.id, &b).unwrap();
    assert_eq!(member_ids(&chat, &room.id), vec![a.clone(), b.clone()]);

    chat.remove_member(&room.id, &b).unwrap();
    assert_eq!(member_ids(&chat, &room.id), vec![a]);
}

// --- Property Tests ---

mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum MemberOp {
        Add(usize),
        Remove(usize),
    }

    fn arb_op(pool: usize) -> impl Strategy<Value = MemberOp> {
        prop_oneof![
            3 => (0..pool).prop_map(MemberOp::Add),
            2 => (0..pool).prop_map(MemberOp::Remove),
        ]
    }

    fn arb_ops(pool: usize, max_len: usize) -> impl Strategy<Value = Vec<MemberOp>> {
        prop::collection::vec(arb_op(pool), 0..max_len)
    }

    proptest! {
        /// Any interleaving of add/remove keeps membership duplicate-free
        /// and equal to an ordered-set model.
        #[test]
        fn prop_membership_matches_ordered_set_model(ops in arb_ops(4, 20)) {
            let (store, chat) = setup();
            let owner = seed_user(&store, "owner");
            let pool: Vec<UserId> =
                (0..4).map(|i| seed_user(&store, &format!("u{i}"))).collect();

            let room = chat
                .create_conversation(&owner, titled("Modelled", &[]))
                .unwrap()
                .id;

            let mut model: Vec<UserId> = vec![owner.clone()];
            for op in &ops {
                match op {
                    MemberOp::Add(i) => {
                        chat.add_member(&room, &pool[*i]).unwrap();
                        if !model.contains(&pool[*i]) {
                            model.push(pool[*i].clone());
                        }
                    }
                    MemberOp::Remove(i) => {
                        chat.remove_member(&room, &pool[*i]).unwrap();
                        model.retain(|id| id != &pool[*i]);
                    }
                }
            }

            prop_assert_eq!(member_ids(&chat, &room), model);
        }
    }
}
