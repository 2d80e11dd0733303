//! Property tests for attribute registries and value resolution.
//!
//! Canonical names are generated in `lower-kebab` form and XML names are their
//! `camelCase` spelling, which keeps the two sets disjoint. Legacy aliases are
//! prefixed with `Old` so they never collide with either.

use mgmt_model::prelude::*;
use proptest::prelude::*;

fn camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn boolean(name: &str) -> AttributeDefinition {
    define(name, &camel(name), ValueType::Boolean, AttributeFlags::RESTART_NONE)
        .expect("generated names are valid")
}

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}(-[a-z]{1,6})?", 1..12)
        .prop_map(|names| names.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Distinct canonical names always build, and every name resolves to itself.
    #[test]
    fn unique_names_build(names in arb_names()) {
        let registry = AttributeRegistry::build(names.iter().map(|n| boolean(n)))
            .expect("unique names build");

        prop_assert_eq!(registry.len(), names.len());
        prop_assert_eq!(registry.names().collect::<Vec<_>>(), names.iter().map(String::as_str).collect::<Vec<_>>());
        for name in &names {
            prop_assert_eq!(registry.resolve(name).unwrap().name(), name.as_str());
            prop_assert_eq!(registry.resolve(&camel(name)).unwrap().name(), name.as_str());
        }
    }

    /// Repeating any definition fails with `DuplicateAttribute`.
    #[test]
    fn duplicate_name_fails(names in arb_names(), pick in any::<prop::sample::Index>()) {
        let duplicate = pick.get(&names).clone();
        let definitions = names
            .iter()
            .map(|n| boolean(n))
            .chain(std::iter::once(boolean(&duplicate)));

        let err = AttributeRegistry::build(definitions).unwrap_err();
        prop_assert!(matches!(err, ModelError::DuplicateAttribute(_)));
    }

    /// A legacy alias resolves to the same definition as the XML name it stands for.
    #[test]
    fn aliases_match_xml_names(names in arb_names()) {
        let aliases: Vec<(String, String)> = names
            .iter()
            .map(|n| (format!("Old{}", camel(n)), n.clone()))
            .collect();
        let registry = AttributeRegistry::build(names.iter().map(|n| boolean(n)))
            .unwrap()
            .with_legacy_aliases(aliases.iter().map(|(a, c)| (a.clone(), c.as_str())))
            .expect("aliases never shadow");

        for (alias, canonical) in &aliases {
            let by_alias = registry.resolve(alias).unwrap();
            let by_xml = registry.resolve(&camel(canonical)).unwrap();
            prop_assert_eq!(by_alias, by_xml);
        }
        prop_assert_eq!(registry.by_xml_name().count(), names.len() * 2);
    }

    /// Resolution is deterministic and resolving an already-resolved value is a no-op.
    #[test]
    fn resolution_is_idempotent(flag in any::<bool>(), as_text in any::<bool>()) {
        let resolver = PropertyResolver::new();
        let send = boolean("send");
        let raw = if as_text {
            serde_json::json!({ "send": flag.to_string() })
        } else {
            serde_json::json!({ "send": flag })
        };

        let first = send.resolve_model_attribute(&resolver, &raw).unwrap();
        let second = send.resolve_model_attribute(&resolver, &raw).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &serde_json::json!(flag));

        let again = send
            .resolve_model_attribute(&resolver, &serde_json::json!({ "send": first.clone() }))
            .unwrap();
        prop_assert_eq!(again, first);
    }
}
