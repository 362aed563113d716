//! Property-based tests for saved defaults round-trip.
//!
//! Whatever size and color strings are saved come back unchanged, with no
//! validation of the color format.

use qrdesk::database::MemoryStorage;
use qrdesk::managers::settings_store::{SettingsStore, SettingsStoreTrait};
use qrdesk::types::settings::QrSettings;
use proptest::prelude::*;

fn arb_color() -> impl Strategy<Value = String> {
    prop_oneof![
        "#[0-9a-f]{6}",
        "#[0-9a-f]{3}",
        "[a-z]{3,12}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn saved_defaults_roundtrip(
        size in 1u32..5000,
        background in arb_color(),
        foreground in arb_color(),
    ) {
        let mut store = SettingsStore::new(MemoryStorage::new());
        store.save(size, &background, &foreground).expect("save should succeed");

        let mut settings = QrSettings::default();
        store.load_defaults().apply_to(&mut settings);

        prop_assert_eq!(settings.size, size);
        prop_assert_eq!(settings.background_color, background);
        prop_assert_eq!(settings.foreground_color, foreground);
    }
}
