use pulse_traits::{BinarySaveState, Error, SaveState};

#[derive(SaveState, Default, Debug, PartialEq)]
struct Divider {
    period: u8,
    counter: u8,
}

#[derive(SaveState, Default)]
struct Unit {
    #[save(skip)]
    label: &'static str,
    steps: [u8; 8],
    #[save(nested)]
    divider: Divider,
}

#[derive(SaveState, Default)]
struct Cursor(u16, #[save(skip)] bool);

#[derive(SaveState)]
struct Wrapper<T> {
    #[save(nested)]
    inner: T,
    ticks: u32,
}

#[test]
fn skipped_fields_survive_restore() {
    let unit = Unit {
        label: "saved",
        steps: [1, 2, 3, 4, 5, 6, 7, 8],
        divider: Divider {
            period: 4,
            counter: 2,
        },
    };
    let data = unit.save_state();

    let mut restored = Unit {
        label: "fresh",
        ..Default::default()
    };
    restored.restore_state(&data);

    assert_eq!(restored.label, "fresh");
    assert_eq!(restored.steps, [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(
        restored.divider,
        Divider {
            period: 4,
            counter: 2
        }
    );
}

#[test]
fn tuple_structs_save_by_position() {
    let cursor = Cursor(0x7ff, true);
    let mut restored = Cursor::default();
    restored.restore_state(&cursor.save_state());

    assert_eq!(restored.0, 0x7ff);
    assert!(!restored.1);
}

#[test]
fn generic_structs_nest_through_binary() {
    let wrapper = Wrapper {
        inner: Divider {
            period: 8,
            counter: 3,
        },
        ticks: 29830,
    };
    let bytes = wrapper.binary_save_state().unwrap();

    let mut restored = Wrapper {
        inner: Divider::default(),
        ticks: 0,
    };
    restored.binary_restore_state(&bytes).unwrap();

    assert_eq!(restored.ticks, 29830);
    assert_eq!(
        restored.inner,
        Divider {
            period: 8,
            counter: 3
        }
    );
}

#[test]
fn truncated_state_is_rejected() {
    let mut divider = Divider {
        period: 1,
        counter: 1,
    };

    let result = divider.binary_restore_state(&[]);

    assert!(matches!(result, Err(Error::Decode(_))));
    assert_eq!(
        divider,
        Divider {
            period: 1,
            counter: 1
        }
    );
}
