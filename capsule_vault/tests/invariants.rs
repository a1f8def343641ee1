use capsule_vault::{
    capsule::{id::CapsuleId, CapsuleSlot},
    crypto::signer::{memory::MemorySigner, sync_signer::SyncSigner},
    test_utils::make_simple_vault,
    time::UnixTimestamp,
};
use std::time::Duration;

#[derive(Debug, arbitrary::Arbitrary)]
struct Step {
    owner: u8,
    lock_for: u16,
    advance: u16,
}

const OWNERS: usize = 3;
const MAX_STEPS: usize = 12;

#[test]
fn test_ids_stay_dense_and_owner_index_consistent() {
    bolero::check!()
        .with_arbitrary::<Vec<Step>>()
        .for_each(|steps| futures::executor::block_on(run(steps)));
}

async fn run(steps: &[Step]) {
    let mut harness = make_simple_vault();
    let owners: Vec<MemorySigner> = (0..OWNERS)
        .map(|_| MemorySigner::generate(&mut rand::thread_rng()))
        .collect();

    let mut created: Vec<(CapsuleId, UnixTimestamp)> = Vec::new();

    for step in steps.iter().take(MAX_STEPS) {
        let owner = &owners[step.owner as usize % OWNERS];
        let now = harness.vault.now();
        let unlock_time = now + Duration::from_secs(step.lock_for.into());

        let payload = harness
            .seal_message(owner, "x")
            .await
            .expect("sealing a one byte message");
        let before = harness.vault.get_total_capsules();

        match harness
            .vault
            .create_capsule(owner.id(), payload, unlock_time)
            .await
        {
            Ok(id) => {
                assert!(step.lock_for > 0);
                assert!(unlock_time > now);
                assert_eq!(id, CapsuleId(before));
                created.push((id, unlock_time));
            }
            Err(_) => {
                assert_eq!(step.lock_for, 0);
                assert_eq!(harness.vault.get_total_capsules(), before);
            }
        }

        harness
            .clock
            .advance(Duration::from_secs(step.advance.into()));
    }

    let total = harness.vault.get_total_capsules();
    assert_eq!(total, created.len() as u64);
    assert_eq!(harness.log.len().await, created.len());
    assert!(!harness.vault.get_capsule(CapsuleId(total)).exists());

    let now = harness.vault.now();
    for (expected, (id, unlock_time)) in created.iter().enumerate() {
        assert_eq!(id.as_u64(), expected as u64);
        match harness.vault.get_capsule(*id) {
            CapsuleSlot::Vacant => panic!("capsule {id} should exist"),
            CapsuleSlot::Occupied(capsule) => {
                assert_eq!(capsule.id(), *id);
                assert_eq!(capsule.unlock_time(), *unlock_time);
                assert_eq!(harness.vault.can_unlock(*id), now >= *unlock_time);
                assert!(harness.vault.get_user_capsules(&capsule.owner()).contains(id));
            }
        }
    }

    let indexed: usize = owners
        .iter()
        .map(|owner| {
            let ids = harness.vault.get_user_capsules(&owner.id());
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            for id in ids {
                assert_eq!(harness.vault.get_capsule(*id).owner(), Some(owner.id()));
            }
            ids.len()
        })
        .sum();
    assert_eq!(indexed as u64, total);
}
