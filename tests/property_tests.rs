//! Property tests for substitution laws

use docparams::{
    is_valid_name, substitute_in_string, substitute_in_value, DocumentValue, Mapping, Parameters,
};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,12}"
}

fn leaf_strategy() -> impl Strategy<Value = DocumentValue> {
    prop_oneof![
        Just(DocumentValue::Null),
        any::<bool>().prop_map(DocumentValue::Bool),
        any::<i64>().prop_map(DocumentValue::from),
        "[ -~]{0,20}".prop_map(DocumentValue::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = DocumentValue> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(DocumentValue::Sequence),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|entries| DocumentValue::Mapping(entries.into_iter().collect::<Mapping>())),
        ]
    })
}

proptest! {
    /// Strings without `{{` come back unchanged whatever the parameters
    #[test]
    fn identity_without_placeholders(
        text in "[^{]*",
        name in name_strategy(),
        value in leaf_strategy(),
    ) {
        let mut params = Parameters::new();
        params.set(name, value);
        prop_assert_eq!(substitute_in_string(&text, &params).unwrap(), text.as_str());
    }

    /// A field that is exactly `{{ n }}` becomes the typed value of `n`
    #[test]
    fn whole_field_preserves_type(name in name_strategy(), value in value_strategy()) {
        let mut doc = Mapping::new();
        doc.insert(name.clone(), DocumentValue::String(format!("{{{{ {} }}}}", name)));
        let mut params = Parameters::new();
        params.set(name.clone(), value.clone());

        let mut expected = Mapping::new();
        expected.insert(name, value);
        prop_assert_eq!(
            substitute_in_value(&DocumentValue::Mapping(doc), &params).unwrap(),
            DocumentValue::Mapping(expected)
        );
    }

    /// String values without `$$` are inserted byte-for-byte, `$` included
    #[test]
    fn dollar_text_is_inserted_literally(
        value in "([ -#%-~]|\\$[^$])*",
        prefix in "[a-z ]{0,8}",
    ) {
        prop_assume!(!value.contains("$$"));
        let mut params = Parameters::new();
        params.set("v", value.clone());
        let template = format!("{prefix}{{{{v}}}}!");
        prop_assert_eq!(
            substitute_in_string(&template, &params).unwrap(),
            format!("{prefix}{value}!")
        );
    }

    /// Resolved values are never rescanned
    #[test]
    fn expansion_is_single_pass(a in name_strategy(), b in name_strategy()) {
        prop_assume!(a != b);
        let mut params = Parameters::new();
        params.set(a.clone(), format!("{{{{{b}}}}}"));
        params.set(b.clone(), "resolved");

        let template = format!("{{{{{a}}}}}");
        prop_assert_eq!(
            substitute_in_string(&template, &params).unwrap(),
            format!("{{{{{b}}}}}")
        );
    }

    /// Unknown names leave the document untouched
    #[test]
    fn unresolved_document_is_unchanged(value in value_strategy()) {
        prop_assert_eq!(substitute_in_value(&value, &Parameters::new()).unwrap(), value);
    }

    /// Containers keep their shape
    #[test]
    fn shape_is_preserved(items in prop::collection::vec("[a-z{} ]{0,10}", 0..6)) {
        let params: Parameters = [("a", "x")].into_iter().collect();
        let doc = DocumentValue::Sequence(items.iter().cloned().map(DocumentValue::String).collect());
        let out = substitute_in_value(&doc, &params).unwrap();
        prop_assert_eq!(out.as_sequence().map(<[DocumentValue]>::len), Some(items.len()));
    }

    /// Generated names match the validator's alphabet
    #[test]
    fn generated_names_are_valid(name in name_strategy()) {
        prop_assert!(is_valid_name(&name));
    }
}
