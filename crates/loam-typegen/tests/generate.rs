//! Integration tests for loam-typegen.

use loam_typegen::{
    Severity, TargetProfile, generate, generate_all, generate_batch,
    input::{parse_openapi_document, parse_schema_document},
    ir::ResolvedType,
    resolve_definition,
};
use serde_json::json;

fn load_fixture(name: &str) -> serde_json::Value {
    let path = format!("tests/fixtures/{}.json", name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture {} not found", name));
    serde_json::from_str(&content).expect("invalid JSON")
}

// === Enums and codecs ===

#[test]
fn state_enum_members_and_codec() {
    let doc = parse_schema_document(&json!({
        "State": { "type": "string", "enum": ["NSW", "VIC"] }
    }))
    .unwrap();
    let profile = TargetProfile::csharp();

    let (resolved, report) = resolve_definition(&doc, "State", &profile);
    assert!(report.is_empty());
    let Some(ResolvedType::Enum(state)) = resolved else {
        panic!("expected enum");
    };

    let nsw = state.decode("NSW").unwrap();
    assert_eq!(nsw.canonical_name, "Nsw");
    assert_eq!(state.encode(nsw), "NSW");
    assert_eq!(state.member("Vic").unwrap().wire_value, "VIC");
    assert!(state.decode("QLD").is_err());
}

#[test]
fn enum_round_trip_laws_hold_for_every_member() {
    let doc = parse_schema_document(&load_fixture("listings")).unwrap();
    let profile = TargetProfile::csharp();

    let (resolved, _) = resolve_definition(&doc, "State", &profile);
    let Some(ResolvedType::Enum(state)) = resolved else {
        panic!("expected enum");
    };
    for member in &state.members {
        assert_eq!(state.decode(state.encode(member)).unwrap(), member);
    }
    for wire in ["NSW", "VIC", "QLD", "N/A"] {
        assert_eq!(state.encode(state.decode(wire).unwrap()), wire);
    }
}

#[test]
fn not_applicable_maps_to_the_same_identifier_on_every_run() {
    let doc = parse_schema_document(&load_fixture("listings")).unwrap();
    let profile = TargetProfile::csharp();

    let first = resolve_definition(&doc, "State", &profile).0.unwrap();
    let second = resolve_definition(&doc, "State", &profile).0.unwrap();
    assert_eq!(first, second);

    let ResolvedType::Enum(state) = first else {
        panic!("expected enum");
    };
    let member = state.decode("N/A").unwrap();
    assert_eq!(member.canonical_name, "NotApplicable");
    assert_eq!(state.member("NotApplicable").unwrap().wire_value, "N/A");
}

// === Objects and nullability ===

#[test]
fn required_and_optional_string_properties() {
    let doc = parse_schema_document(&json!({
        "Address": {
            "type": "object",
            "required": ["Suburb"],
            "properties": {
                "Suburb": { "type": "string" },
                "UnitNumber": { "type": "string" }
            }
        }
    }))
    .unwrap();

    let out = generate(&doc, &["Address"], &TargetProfile::csharp());
    assert!(out.report.is_empty());
    let text = out.text_for("Address").unwrap();
    assert!(text.contains("public string Suburb { get; set; } = \"\";"));
    assert!(text.contains("public string? UnitNumber { get; set; }"));
}

#[test]
fn address_rendering_from_fixture() {
    let doc = parse_schema_document(&load_fixture("listings")).unwrap();
    let out = generate(&doc, &["Address"], &TargetProfile::csharp());

    insta::assert_snapshot!(out.text_for("Address").unwrap(), @r###"
    /// <summary>
    /// Postal address of a listing.
    /// </summary>
    public class Address
    {
        public string? Postcode { get; set; }

        public State? State { get; set; }

        public string Suburb { get; set; } = "";

        public string? UnitNumber { get; set; }
    }
    "###);
}

// === allOf ===

#[test]
fn all_of_merges_each_property_once_and_unions_required() {
    let doc = parse_schema_document(&load_fixture("listings")).unwrap();
    let profile = TargetProfile::csharp();

    let (resolved, report) = resolve_definition(&doc, "Listing", &profile);
    assert!(report.is_empty());
    let Some(ResolvedType::Object(listing)) = resolved else {
        panic!("expected object");
    };

    let mut names: Vec<&str> = listing.fields.iter().map(|f| f.name.as_str()).collect();
    let mut unique = names.clone();
    unique.dedup();
    assert_eq!(names, unique);
    names.sort();
    assert_eq!(
        names,
        vec!["Address", "CreatedAt", "Id", "Photos", "SettlementDate"]
    );

    let required: Vec<&str> = listing
        .fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(required, vec!["Address", "CreatedAt", "Id"]);
}

#[test]
fn all_of_result_renders_with_date_mappings() {
    let doc = parse_schema_document(&load_fixture("listings")).unwrap();
    let out = generate(&doc, &["Listing"], &TargetProfile::csharp());

    let text = out.text_for("Listing").unwrap();
    assert!(text.contains("public DateTimeOffset CreatedAt { get; set; }"));
    assert!(text.contains("public DateOnly? SettlementDate { get; set; }"));
    assert!(text.contains("public Address Address { get; set; }"));
    assert!(text.contains("public List<string>? Photos { get; set; }"));
}

// === Cycles ===

#[test]
fn object_cycle_yields_two_outputs_with_back_references() {
    let doc = parse_schema_document(&load_fixture("cycles")).unwrap();
    let out = generate(&doc, &["Person", "Agency"], &TargetProfile::csharp());

    assert_eq!(out.generated.len(), 2);
    assert!(out.report.is_empty());
    assert!(out.text_for("Person").unwrap().contains("public Agency? Agency { get; set; }"));
    assert!(out.text_for("Agency").unwrap().contains("public Person? Principal { get; set; }"));
    // Self-reference terminates the same way.
    assert!(out.text_for("Person").unwrap().contains("public Person? Partner { get; set; }"));
}

#[test]
fn all_of_cycle_reports_once_and_emits_nothing() {
    let doc = parse_schema_document(&load_fixture("cycles")).unwrap();
    let out = generate(&doc, &["LoopA"], &TargetProfile::csharp());

    assert!(out.generated.is_empty());
    assert_eq!(out.report.len(), 1);
    let finding = &out.report.findings()[0];
    assert_eq!(finding.severity, Severity::Error);
    assert_eq!(finding.definition, "LoopA");
    assert!(finding.message.contains("LoopA"));
    assert!(finding.message.contains("LoopB"));
}

// === Partial failure ===

#[test]
fn dangling_reference_abandons_definition_but_siblings_generate() {
    let doc = parse_schema_document(&json!({
        "Broken": {
            "type": "object",
            "properties": { "Target": { "$ref": "#/definitions/Missing" } }
        },
        "Fine": { "type": "string", "enum": ["a", "b"] }
    }))
    .unwrap();

    let out = generate(&doc, &["Broken", "Fine"], &TargetProfile::csharp());
    assert_eq!(out.generated.len(), 1);
    assert!(out.text_for("Fine").is_some());
    assert!(out.report.has_errors());
    let finding = &out.report.findings()[0];
    assert_eq!(finding.definition, "Broken");
    assert!(finding.message.contains("Missing"));
}

#[test]
fn incompatible_merge_fails_definition_and_dependents() {
    let doc = parse_schema_document(&json!({
        "Base": {
            "type": "object",
            "properties": { "Code": { "type": "string" } }
        },
        "Clash": {
            "allOf": [
                { "$ref": "#/definitions/Base" },
                { "type": "object", "properties": { "Code": { "type": "integer" } } }
            ]
        },
        "UsesClash": {
            "type": "object",
            "properties": { "Inner": { "$ref": "#/definitions/Clash" } }
        },
        "Standalone": { "type": "boolean" }
    }))
    .unwrap();

    let out = generate(
        &doc,
        &["Clash", "UsesClash", "Standalone"],
        &TargetProfile::csharp(),
    );
    assert!(out.text_for("Clash").is_none());
    assert!(out.text_for("UsesClash").is_none());
    assert!(out.text_for("Standalone").is_some());
    assert!(out.report.has_errors());
}

// === Variants ===

#[test]
fn one_of_infers_discriminator_and_renders_wrapper() {
    let doc = parse_openapi_document(&load_fixture("openapi")).unwrap();
    let profile = TargetProfile::csharp();

    let (resolved, report) = resolve_definition(&doc, "ListingEvent", &profile);
    assert!(report.is_empty());
    let Some(ResolvedType::Variant(event)) = resolved else {
        panic!("expected variant");
    };
    assert_eq!(event.discriminator.as_deref(), Some("Method"));

    let out = generate(&doc, &["ListingEvent"], &profile);
    let text = out.text_for("ListingEvent").unwrap();
    assert!(text.contains("public sealed class ListingEvent"));
    assert!(text.contains("public string? Method { get; set; }"));
    assert!(text.contains("public SaleListing? SaleListing { get; set; }"));
    assert!(text.contains("public RentalListing? RentalListing { get; set; }"));
}

#[test]
fn inline_enum_property_renders_as_sibling_with_codec() {
    let doc = parse_openapi_document(&load_fixture("openapi")).unwrap();
    let out = generate(&doc, &["SaleListing"], &TargetProfile::csharp());

    let text = out.text_for("SaleListing").unwrap();
    assert!(text.contains("public SaleListingMethod Method { get; set; }"));
    assert!(text.contains("public enum SaleListingMethod"));
    assert!(text.contains("public static class SaleListingMethodExtensions"));
    assert!(text.contains("\"auction\" => SaleListingMethod.Auction,"));
}

// === Batch ===

#[test]
fn batch_generation_matches_serial_for_whole_document() {
    let doc = parse_schema_document(&load_fixture("listings")).unwrap();
    let profile = TargetProfile::csharp();

    let names: Vec<&str> = doc.names().collect();
    let serial = generate(&doc, &names, &profile);
    let batch = generate_batch(&doc, &names, &profile);
    assert_eq!(serial, batch);

    let all = generate_all(&doc, &profile);
    assert_eq!(all, serial);
}
