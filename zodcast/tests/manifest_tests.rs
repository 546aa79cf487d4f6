//! End-to-end tests: manifests in, Zod schemas out.

#![cfg(feature = "manifest")]

use zodcast::manifest::{LoadedTypes, ManifestError, ManifestSet};
use zodcast::presets::Preset;
use zodcast::{ConvertError, Converter, CustomRegistry, FieldNaming};

const APP: &str = r#"
package = "example.com/app"
roots = ["User"]

[[types]]
name = "User"
fields = [
  { name = "ID", type = "int64", tag = 'json:"id"' },
  { name = "Name", type = "string", tag = 'json:"name"' },
  { name = "Email", type = "*string", tag = 'json:"email,omitempty"' },
  { name = "Address", type = "Address", tag = 'json:"address"' },
  { name = "Tags", type = "Set[string]", tag = 'json:"tags"' },
  { name = "Role", type = "Role", tag = 'json:"role"' },
  { name = "CreatedAt", type = "time.Time", tag = 'json:"created_at"' },
]

[[types]]
name = "Address"
fields = [
  { name = "Street", type = "string", tag = 'json:"street"' },
  { name = "City", type = "string", tag = 'json:"city"' },
]

[[types]]
name = "Set[string]"
underlying = "map[string]struct{}"
zod_schema = { preset = "set" }

[[types]]
name = "Role"
underlying = "string"
marshals_json = true
zod_schema = { constant = 'z.enum(["admin", "user"])' }
"#;

fn load_toml(text: &str) -> LoadedTypes {
    let mut set = ManifestSet::new();
    set.add_toml("app.toml", text).unwrap();
    set.load().unwrap()
}

#[test]
fn test_toml_manifest_end_to_end() {
    let loaded = load_toml(APP);
    let output = Converter::new(&loaded.types)
        .convert_all(&loaded.roots)
        .unwrap();

    insta::assert_snapshot!(output, @r#"
    export const AddressSchema = z.object({
      street: z.string(),
      city: z.string(),
    })
    export type Address = z.infer<typeof AddressSchema>

    export const UserSchema = z.object({
      id: z.number(),
      name: z.string(),
      email: z.string().optional(),
      address: AddressSchema,
      tags: z.string().array(),
      role: z.enum(["admin", "user"]),
      created_at: z.string(),
    })
    export type User = z.infer<typeof UserSchema>
    "#);
}

#[test]
fn test_strict_mode_accepts_declared_schemas() {
    let loaded = load_toml(APP);
    let result = Converter::new(&loaded.types)
        .with_strict_custom_schemas(true)
        .convert_all(&loaded.roots);
    assert!(result.is_ok());
}

#[test]
fn test_prefix_applies_to_references() {
    let loaded = load_toml(APP);
    let output = Converter::new(&loaded.types)
        .with_prefix("Api")
        .convert_all(&loaded.roots)
        .unwrap();

    assert!(output.contains("export const ApiAddressSchema = z.object({"));
    assert!(output.contains("  address: ApiAddressSchema,\n"));
    assert!(output.contains("export type ApiUser = z.infer<typeof ApiUserSchema>"));
}

#[test]
fn test_json_manifests_across_packages() {
    let mut set = ManifestSet::new();
    set.add_json(
        "api.json",
        r#"{
            "package": "example.com/api",
            "roots": ["Order"],
            "types": [
                { "name": "Order", "fields": [
                    { "type": "example.com/model.Audit", "tag": "json:\",inline\"" },
                    { "name": "Total", "type": "github.com/shopspring/decimal.Decimal", "tag": "json:\"total\"" },
                    { "name": "Lines", "type": "[]*example.com/model.Line", "tag": "json:\"lines,omitempty\"" }
                ] }
            ]
        }"#,
    )
    .unwrap();
    set.add_json(
        "model.json",
        r#"{
            "package": "example.com/model",
            "types": [
                { "name": "Audit", "fields": [
                    { "name": "CreatedBy", "type": "string" },
                    { "name": "Note", "type": "*string" }
                ] },
                { "name": "Line", "fields": [
                    { "name": "SKU", "type": "string" },
                    { "name": "Qty", "type": "uint" }
                ] }
            ]
        }"#,
    )
    .unwrap();
    set.add_json(
        "decimal.json",
        r#"{
            "package": "github.com/shopspring/decimal",
            "types": [{ "name": "Decimal", "fields": [], "marshals_json": true }]
        }"#,
    )
    .unwrap();

    let loaded = set.load().unwrap();
    let mut custom = CustomRegistry::new();
    Preset::Decimal.install(&mut custom);

    let output = Converter::new(&loaded.types)
        .with_custom(custom)
        .with_field_naming(FieldNaming::CamelCase)
        .with_strict_custom_schemas(true)
        .convert_all(&loaded.roots)
        .unwrap();

    insta::assert_snapshot!(output, @r#"
    export const LineSchema = z.object({
      sku: z.string(),
      qty: z.number(),
    })
    export type Line = z.infer<typeof LineSchema>

    export const OrderSchema = z.object({
      createdBy: z.string(),
      note: z.string().nullable(),
      total: z.string(),
      lines: LineSchema.array().optional(),
    })
    export type Order = z.infer<typeof OrderSchema>
    "#);
}

#[test]
fn test_generic_preset_from_manifest() {
    let mut set = ManifestSet::new();
    set.add_json(
        "profile.json",
        r#"{
            "package": "example.com/app",
            "roots": ["Profile"],
            "types": [
                { "name": "Profile", "fields": [
                    { "name": "Nickname", "type": "4d63.com/optional.Optional[string]", "tag": "json:\"nickname\"" }
                ] }
            ]
        }"#,
    )
    .unwrap();
    set.add_json(
        "optional.json",
        r#"{
            "package": "4d63.com/optional",
            "types": [{ "name": "Optional[string]", "underlying": "[]string" }]
        }"#,
    )
    .unwrap();

    let loaded = set.load().unwrap();
    let mut custom = CustomRegistry::new();
    Preset::Optional.install(&mut custom);

    let output = Converter::new(&loaded.types)
        .with_custom(custom)
        .convert_all(&loaded.roots)
        .unwrap();
    assert!(output.contains("  nickname: z.string().optional(),\n"));
}

#[test]
fn test_malformed_method_fails_conversion() {
    let loaded = load_toml(
        r#"
package = "p"
roots = ["Event"]

[[types]]
name = "Event"
fields = [{ name = "Kind", type = "Kind" }]

[[types]]
name = "Kind"
underlying = "int"
zod_schema = { method = "func(int) string" }
"#,
    );

    let err = Converter::new(&loaded.types)
        .convert_all(&loaded.roots)
        .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MalformedCustomSchema { ref signature, .. } if signature == "func(int) string"
    ));
}

#[test]
fn test_strict_mode_rejects_undeclared_marshaler() {
    let loaded = load_toml(
        r#"
package = "p"
roots = ["Event"]

[[types]]
name = "Event"
fields = [{ name = "At", type = "Stamp" }]

[[types]]
name = "Stamp"
underlying = "int64"
marshals_json = true
"#,
    );

    let relaxed = Converter::new(&loaded.types).convert_all(&loaded.roots);
    assert!(relaxed.unwrap().contains("  At: z.number(),\n"));

    let err = Converter::new(&loaded.types)
        .with_strict_custom_schemas(true)
        .convert_all(&loaded.roots)
        .unwrap_err();
    assert!(matches!(err, ConvertError::StrictModeViolation { .. }));
}

#[test]
fn test_recursive_manifest_type() {
    let loaded = load_toml(
        r#"
package = "p"
roots = ["Node"]

[[types]]
name = "Node"
fields = [
  { name = "Value", type = "int" },
  { name = "Next", type = "*Node" },
]
"#,
    );

    let err = Converter::new(&loaded.types)
        .convert_all(&loaded.roots)
        .unwrap_err();
    assert!(matches!(err, ConvertError::RecursiveType { .. }));
}

#[test]
fn test_non_struct_root() {
    let loaded = load_toml(
        r#"
package = "p"
roots = ["[]string"]
"#,
    );

    let err = Converter::new(&loaded.types)
        .convert_all(&loaded.roots)
        .unwrap_err();
    assert_eq!(
        err,
        ConvertError::NonStructRoot {
            type_name: "[]string".to_string()
        }
    );
}

#[test]
fn test_unknown_root_reference() {
    let mut set = ManifestSet::new();
    set.add_toml("r.toml", "package = \"p\"\nroots = [\"Missing\"]\n")
        .unwrap();
    let err = set.load().unwrap_err();
    assert!(matches!(err, ManifestError::UnknownType { ref reference, .. } if reference == "p.Missing"));
}
