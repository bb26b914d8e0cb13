use lumen_blocks::config::{BlockDef, BlocksConfig};
use lumen_blocks::{BlockRegistry, OPAQUE_ABSORPTION, Rgb, VoxelProperties};
use proptest::prelude::*;

fn arb_def(i: usize) -> impl Strategy<Value = BlockDef> {
    (
        any::<Option<bool>>(),
        any::<Option<bool>>(),
        any::<Option<u8>>(),
        proptest::option::of(any::<[u8; 3]>()),
    )
        .prop_map(move |(solid, blocks_skylight, absorption, emission)| BlockDef {
            name: format!("b{i}"),
            id: Some(i as u16 + 1),
            solid,
            blocks_skylight,
            absorption,
            emission,
        })
}

fn arb_config() -> impl Strategy<Value = BlocksConfig> {
    (0usize..12)
        .prop_flat_map(|n| (0..n).map(arb_def).collect::<Vec<_>>())
        .prop_map(|blocks| BlocksConfig {
            blocks,
            unknown_block: None,
        })
}

proptest! {
    #[test]
    fn compiled_props_stay_in_range(cfg in arb_config()) {
        let n = cfg.blocks.len();
        let reg = BlockRegistry::from_configs(cfg).unwrap();
        prop_assert_eq!(reg.len(), n);
        for id in 0..=(n as u16 + 3) {
            let p = reg.lookup(id);
            prop_assert!(p.absorption <= OPAQUE_ABSORPTION);
            if let Some(e) = p.emission() {
                prop_assert!(!e.is_zero());
                prop_assert_eq!(e, e.clamped());
            }
        }
    }

    #[test]
    fn skylight_defaults_to_solidity(solid in any::<bool>()) {
        let cfg = BlocksConfig {
            blocks: vec![BlockDef { id: Some(1), solid: Some(solid), ..BlockDef::named("x") }],
            unknown_block: None,
        };
        let reg = BlockRegistry::from_configs(cfg).unwrap();
        let ty = reg.get(1).unwrap();
        prop_assert_eq!(ty.blocks_skylight, solid);
        prop_assert_eq!(ty.absorption == OPAQUE_ABSORPTION, solid);
    }

    #[test]
    fn rgb_max_is_upper_bound(a in any::<[u8; 3]>(), b in any::<[u8; 3]>()) {
        let (a, b) = (Rgb::from(a).clamped(), Rgb::from(b).clamped());
        let m = a.max(b);
        prop_assert!(a.dominated_by(m));
        prop_assert!(b.dominated_by(m));
        prop_assert!(m.attenuated().dominated_by(m));
    }
}
