//! Property-based tests over random client operations and delivery orders.
//!
//! Each generated step mutates the simulation; the standard invariants are
//! checked across every step, and broadcast convergence is checked once all
//! inboxes have drained.

use iochat_harness::{InvariantRegistry, SimServer, SystemSnapshot};
use proptest::prelude::*;

const CLIENTS: usize = 3;

/// One simulation step.
#[derive(Debug, Clone)]
enum Step {
    Login { client: usize, name: String },
    Send { client: usize, text: String },
    Pump,
    Deliver,
    Unmount { client: usize },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        2 => (0..CLIENTS, "[a-z]{0,6}").prop_map(|(client, name)| Step::Login { client, name }),
        4 => (0..CLIENTS, "[a-z ]{0,10}").prop_map(|(client, text)| Step::Send { client, text }),
        3 => Just(Step::Pump),
        6 => Just(Step::Deliver),
        1 => (0..CLIENTS).prop_map(|client| Step::Unmount { client }),
    ]
}

fn apply(server: &mut SimServer, step: Step) {
    match step {
        Step::Login { client, name } => {
            let _ = server.client(client).map(|c| c.login(&name));
        },
        Step::Send { client, text } => {
            let _ = server.client(client).map(|c| c.send(&text));
        },
        Step::Pump => {
            server.pump();
        },
        Step::Deliver => {
            server.deliver_random();
        },
        Step::Unmount { client } => {
            if let Some(c) = server.client_mut(client) {
                c.unmount();
            }
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_invariants_hold_every_step(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 0..80),
    ) {
        let mut server = SimServer::with_seed(seed);
        for _ in 0..CLIENTS {
            server.connect();
        }
        let invariants = InvariantRegistry::standard();

        let mut before = SystemSnapshot::capture(&server);
        for step in steps {
            apply(&mut server, step);
            let after = SystemSnapshot::capture(&server);
            let result = invariants.check_all(&before, &after);
            prop_assert!(result.is_ok(), "violations: {:?}", result.err());
            before = after;
        }

        server.run_until_idle();
        let after = SystemSnapshot::capture(&server);
        prop_assert!(invariants.check_all(&before, &after).is_ok());
    }

    #[test]
    fn prop_mounted_clients_converge(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 0..80),
    ) {
        let mut server = SimServer::with_seed(seed);
        for _ in 0..CLIENTS {
            server.connect();
        }

        let mut unmounted = [false; CLIENTS];
        for step in steps {
            if let Step::Unmount { client } = step {
                unmounted[client] = true;
            }
            apply(&mut server, step);
        }
        server.run_until_idle();

        let snapshot = SystemSnapshot::capture(&server);
        let views: Vec<_> = snapshot
            .clients
            .iter()
            .filter(|c| !unmounted[c.id])
            .map(|c| c.remote_entries())
            .collect();
        for pair in views.windows(2) {
            prop_assert_eq!(&pair[0], &pair[1]);
        }
        for view in &views {
            prop_assert_eq!(view.len(), server.broadcasts().len());
        }
    }
}
