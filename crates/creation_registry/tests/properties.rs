//! Property tests for the registry rules.

use atelier_creation_registry::{
    CallContext, ContentHash, ContractError, CreationDetails, CreationId, CreationRegistration,
    CreationRegistry, Principal,
};
use proptest::prelude::*;

fn details_strategy() -> impl Strategy<Value = CreationDetails> {
    (".{0,24}", ".{0,48}", "[a-z]{0,10}")
        .prop_map(|(title, description, category)| {
            CreationDetails::new(title, description, category)
        })
}

fn registration_strategy() -> impl Strategy<Value = CreationRegistration> {
    (details_strategy(), any::<[u8; 32]>()).prop_map(|(details, hash)| {
        CreationRegistration::new(details, ContentHash::from_bytes(hash))
    })
}

fn principal_strategy() -> impl Strategy<Value = Principal> {
    "[A-Z0-9]{8,40}".prop_map(Principal::new)
}

fn id_strategy() -> impl Strategy<Value = CreationId> {
    "[a-z0-9-]{1,16}".prop_map(CreationId::new)
}

proptest! {
    #[test]
    fn second_registration_is_rejected_and_discarded(
        id in id_strategy(),
        first in registration_strategy(),
        second in registration_strategy(),
        creator in principal_strategy(),
        other in principal_strategy(),
        height in any::<u64>(),
    ) {
        let registry = CreationRegistry::new();
        registry.register(id.clone(), first, &CallContext::new(creator.clone(), height)).unwrap();
        let before = registry.get(&id).unwrap();

        for caller in [creator, other] {
            let err = registry
                .register(id.clone(), second.clone(), &CallContext::new(caller, height.saturating_add(1)))
                .unwrap_err();
            prop_assert_eq!(err.contract(), Some(ContractError::AlreadyRegistered));
            prop_assert_eq!(registry.get(&id).unwrap(), before.clone());
        }
        prop_assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn get_after_register_returns_inputs(
        id in id_strategy(),
        registration in registration_strategy(),
        creator in principal_strategy(),
        height in any::<u64>(),
    ) {
        let registry = CreationRegistry::new();
        let returned = registry
            .register(id.clone(), registration.clone(), &CallContext::new(creator.clone(), height))
            .unwrap();
        prop_assert_eq!(&returned, &id);

        let record = registry.get(&id).unwrap().expect("registered");
        prop_assert_eq!(record.creator, creator);
        prop_assert_eq!(record.title, registration.details.title);
        prop_assert_eq!(record.description, registration.details.description);
        prop_assert_eq!(record.category, registration.details.category);
        prop_assert_eq!(record.content_hash, registration.content_hash);
        prop_assert_eq!(record.timestamp, height);
    }

    #[test]
    fn only_the_creator_may_update(
        id in id_strategy(),
        registration in registration_strategy(),
        creator in principal_strategy(),
        intruder in principal_strategy(),
        details in details_strategy(),
    ) {
        prop_assume!(creator != intruder);
        let registry = CreationRegistry::new();
        registry.register(id.clone(), registration, &CallContext::new(creator, 5)).unwrap();
        let before = registry.get(&id).unwrap();

        let err = registry
            .update(&id, details, &CallContext::new(intruder, 6))
            .unwrap_err();
        prop_assert_eq!(err.contract(), Some(ContractError::NotAuthorized));
        prop_assert_eq!(registry.get(&id).unwrap(), before);
    }

    #[test]
    fn fixed_fields_survive_any_number_of_updates(
        id in id_strategy(),
        registration in registration_strategy(),
        creator in principal_strategy(),
        height in any::<u64>(),
        updates in prop::collection::vec(details_strategy(), 1..8),
    ) {
        let registry = CreationRegistry::new();
        registry
            .register(id.clone(), registration.clone(), &CallContext::new(creator.clone(), height))
            .unwrap();

        let mut last = None;
        for (offset, details) in updates.into_iter().enumerate() {
            let ctx = CallContext::new(creator.clone(), height.saturating_add(offset as u64 + 1));
            registry.update(&id, details.clone(), &ctx).unwrap();
            last = Some(details);
        }

        let record = registry.get(&id).unwrap().expect("registered");
        prop_assert_eq!(&record.creator, &creator);
        prop_assert_eq!(record.content_hash, registration.content_hash);
        prop_assert_eq!(record.timestamp, height);
        prop_assert_eq!(Some(record.details()), last);
        prop_assert_eq!(registry.creations_by_creator(&creator).unwrap(), vec![id]);
    }

    #[test]
    fn unregistered_ids_are_absent(
        registered in id_strategy(),
        probe in id_strategy(),
        registration in registration_strategy(),
        details in details_strategy(),
        caller in principal_strategy(),
    ) {
        prop_assume!(registered != probe);
        let registry = CreationRegistry::new();
        registry
            .register(registered, registration, &CallContext::new(caller.clone(), 1))
            .unwrap();

        prop_assert_eq!(registry.get(&probe).unwrap(), None);
        let err = registry
            .update(&probe, details, &CallContext::new(caller, 2))
            .unwrap_err();
        prop_assert_eq!(err.contract(), Some(ContractError::NotFound));
    }
}
