//! End-to-end suite for reflmig-core: whole headers on disk, whole runs.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("reflmig_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(dir.join("Source")).unwrap();
    dir
}

fn rewriter() -> Rewriter {
    Rewriter::new(RewriteRules::default()).unwrap()
}

fn changed_text(input: &str) -> String {
    match rewriter().rewrite(input).unwrap() {
        RewriteOutcome::Changed(r) => r.text,
        other => panic!("expected Changed, got {:?}", other),
    }
}

const FOO_HEADER: &str = "#pragma once\n\
#include \"Object.h\"\n\
\n\
class Foo : public Bar\n\
{\n\
public:\n\
    DECLARE_CLASS(Foo, Bar)\n\
    DECLARE_DUPLICATE(Foo)\n\
\n\
    Foo();\n\
};\n";

const FOO_EXPECTED: &str = "#pragma once\n\
#include \"Object.h\"\n\
#include \"Foo.generated.h\"\n\
\n\
UCLASS()\n\
class Foo : public Bar\n\
{\n\
public:\n\
    GENERATED_REFLECTION_BODY()\n\
    Foo();\n\
};\n";

// Scenario: one declaration, one duplicate, one include
#[test]
fn test_reference_scenario() {
    let root = setup_temp_project();
    write_file(&root.join("Source/Foo.h"), FOO_HEADER);

    let report = Migrator::new(&root)
        .targets(["Source/Foo.h"])
        .run()
        .unwrap();

    assert_eq!(report.converted, 1);
    assert_eq!(
        report.files[0].outcome,
        EditOutcome::Converted {
            declarations: vec![DeclarationInfo::new("Foo", "Bar")],
            warnings: vec![],
        }
    );
    assert_eq!(
        fs::read_to_string(root.join("Source/Foo.h")).unwrap(),
        FOO_EXPECTED
    );
}

// Idempotence: a second run changes nothing and says why
#[test]
fn test_second_run_is_noop() {
    let root = setup_temp_project();
    write_file(&root.join("Source/Foo.h"), FOO_HEADER);
    let migrator = Migrator::new(&root).targets(["Source/Foo.h"]);

    migrator.run().unwrap();
    let after_first = fs::read(root.join("Source/Foo.h")).unwrap();

    let second = migrator.run().unwrap();
    assert_eq!(second.converted, 0);
    assert_eq!(
        second.files[0].outcome.skip_reason(),
        Some(SkipReason::AlreadyConverted)
    );
    assert_eq!(fs::read(root.join("Source/Foo.h")).unwrap(), after_first);
}

// Marker anywhere blocks every edit, even with legacy macros left over
#[test]
fn test_marker_blocks_partial_reconversion() {
    let input = "#include \"A.h\"\n\
                 class UA : public UObject\n{\n\tGENERATED_REFLECTION_BODY()\n};\n\
                 class UB : public UObject\n{\n\tDECLARE_CLASS(UB, UObject)\n};\n";
    assert_eq!(
        rewriter().rewrite(input).unwrap(),
        RewriteOutcome::AlreadyConverted
    );
}

// Same parent, two classes: each rewritten on its own
#[test]
fn test_same_parent_two_classes() {
    let input = "#pragma once\n\
                 #include \"Widget.h\"\n\
                 \n\
                 class UA : public UWidget\n\
                 {\n\
                 \tDECLARE_CLASS(UA, UWidget)\n\
                 \tDECLARE_DUPLICATE(UA)\n\
                 };\n\
                 \n\
                 class UB : public UWidget\n\
                 {\n\
                 \tDECLARE_CLASS(UB, UWidget)\n\
                 \tDECLARE_DUPLICATE(UB)\n\
                 };\n";
    let expected = "#pragma once\n\
                    #include \"Widget.h\"\n\
                    #include \"UA.generated.h\"\n\
                    #include \"UB.generated.h\"\n\
                    \n\
                    UCLASS()\n\
                    class UA : public UWidget\n\
                    {\n\
                    \tGENERATED_REFLECTION_BODY()\n\
                    };\n\
                    \n\
                    UCLASS()\n\
                    class UB : public UWidget\n\
                    {\n\
                    \tGENERATED_REFLECTION_BODY()\n\
                    };\n";
    assert_eq!(changed_text(input), expected);
}

// Non-interference: everything outside the edited spans survives byte for byte
#[test]
fn test_untouched_regions_identical() {
    let prologue = "// Copyright notice\r\n#pragma once\r\n#include <vector>\r\n#include \"Object.h\" // base\r\n";
    let between = "\r\n/** Doc comment with DECLARE_CLASS mentioned in prose */\r\n";
    let body_tail = "\r\n\tvoid Tick(float DeltaTime);\r\n\tTArray<int> Values;\r\n};\r\n\r\n// trailing\r\n";
    let input = format!(
        "{}{}class UFoo final : public UObject\r\n{{\r\n\tDECLARE_CLASS(UFoo, UObject)\r\n\tDECLARE_DUPLICATE(UFoo){}",
        prologue, between, body_tail
    );

    let out = changed_text(&input);
    let expected = format!(
        "{}#include \"UFoo.generated.h\"\r\n{}UCLASS()\r\nclass UFoo final : public UObject\r\n{{\r\n\tGENERATED_REFLECTION_BODY()\r\n\tvoid Tick(float DeltaTime);\r\n\tTArray<int> Values;\r\n}};\r\n\r\n// trailing\r\n",
        prologue, between
    );
    assert_eq!(out, expected);
}

// Whitespace tolerance: multi-line form converts like the single-line form
#[test]
fn test_multiline_declaration_matches_single_line() {
    let single = "#include \"A.h\"\nclass UFoo : public UBar\n{\n\tDECLARE_CLASS(UFoo, UBar)\n\tDECLARE_DUPLICATE(UFoo)\n\tint X;\n};\n";
    let multi = "#include \"A.h\"\nclass UFoo\n\t: public UBar\n{\n\tDECLARE_CLASS(\n\t\tUFoo ,\n   UBar\n\t)\n\tDECLARE_DUPLICATE (  UFoo  )\n\tint X;\n};\n";

    let single_out = changed_text(single);
    let multi_out = changed_text(multi);

    assert_eq!(
        single_out,
        "#include \"A.h\"\n#include \"UFoo.generated.h\"\nUCLASS()\nclass UFoo : public UBar\n{\n\tGENERATED_REFLECTION_BODY()\n\tint X;\n};\n"
    );
    assert_eq!(
        multi_out,
        "#include \"A.h\"\n#include \"UFoo.generated.h\"\nUCLASS()\nclass UFoo\n\t: public UBar\n{\n\tGENERATED_REFLECTION_BODY()\n\tint X;\n};\n"
    );
}

// Exclusion list wins even when the file is full of declarations
#[test]
fn test_excluded_macro_definition_file() {
    let root = setup_temp_project();
    let macros = "#pragma once\n#define DECLARE_CLASS(ThisClass, SuperClass) \\\n\tusing Super = SuperClass;\n#define DECLARE_DUPLICATE(ThisClass)\n";
    write_file(&root.join("Source/Runtime/Core/Object/ObjectMacros.h"), macros);

    let report = Migrator::new(&root)
        .targets(["Source/Runtime/Core/Object/ObjectMacros.h"])
        .run()
        .unwrap();

    assert_eq!(report.files[0].outcome.skip_reason(), Some(SkipReason::Excluded));
    assert_eq!(
        fs::read_to_string(root.join("Source/Runtime/Core/Object/ObjectMacros.h")).unwrap(),
        macros
    );
}

// No include anywhere: still converted, include step is a no-op
#[test]
fn test_no_include_directive_converted() {
    let root = setup_temp_project();
    write_file(
        &root.join("Source/Bare.h"),
        "#pragma once\n\nclass UBare : public UObject\n{\n\tDECLARE_CLASS(UBare, UObject)\n\tDECLARE_DUPLICATE(UBare)\n};\n",
    );

    let report = Migrator::new(&root).targets(["Source/Bare.h"]).run().unwrap();
    assert!(report.files[0].outcome.is_converted());
    assert_eq!(report.warning_count(), 1);

    let content = fs::read_to_string(root.join("Source/Bare.h")).unwrap();
    assert_eq!(
        content,
        "#pragma once\n\nUCLASS()\nclass UBare : public UObject\n{\n\tGENERATED_REFLECTION_BODY()\n};\n"
    );
    assert!(!content.contains(".generated.h"));
}

// A header that is not UTF-8 is reported and the run moves on
#[test]
fn test_unreadable_header_does_not_stop_run() {
    let root = setup_temp_project();
    fs::write(root.join("Source/Latin1.h"), b"// caf\xE9\nDECLARE_CLASS(UA, UObject)\n").unwrap();
    write_file(&root.join("Source/Foo.h"), FOO_HEADER);

    let report = Migrator::new(&root)
        .targets(["Source/Latin1.h", "Source/Foo.h"])
        .run()
        .unwrap();

    assert_eq!(
        report.files[0].outcome.skip_reason(),
        Some(SkipReason::Unreadable)
    );
    assert!(report.files[1].outcome.is_converted());
    assert_eq!(
        fs::read(root.join("Source/Latin1.h")).unwrap(),
        b"// caf\xE9\nDECLARE_CLASS(UA, UObject)\n"
    );
}

// BOM survives the round trip and is not counted as content
#[test]
fn test_bom_header_round_trip() {
    let root = setup_temp_project();
    let path = root.join("Source/Bom.h");
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(FOO_HEADER.as_bytes());
    fs::write(&path, &bytes).unwrap();

    let report = Migrator::new(&root).targets(["Source/Bom.h"]).run().unwrap();
    assert!(report.files[0].outcome.is_converted());

    let written = fs::read(&path).unwrap();
    assert_eq!(&written[..3], b"\xEF\xBB\xBF");
    assert_eq!(std::str::from_utf8(&written[3..]).unwrap(), FOO_EXPECTED);
    assert_eq!(
        report.files[0].after_sha256.as_deref(),
        Some(content_hash(&written).as_str())
    );
}

// Dry run reports the same outcome as a real run but writes nothing
#[test]
fn test_dry_run_matches_real_run() {
    let root = setup_temp_project();
    write_file(&root.join("Source/Foo.h"), FOO_HEADER);
    let migrator = Migrator::new(&root).targets(["Source/Foo.h"]);

    let dry = migrator.clone().dry_run(true).run().unwrap();
    assert!(dry.dry_run);
    assert_eq!(fs::read_to_string(root.join("Source/Foo.h")).unwrap(), FOO_HEADER);

    let real = migrator.run().unwrap();
    assert_eq!(dry.files[0].outcome, real.files[0].outcome);
    assert_eq!(dry.files[0].after_sha256, real.files[0].after_sha256);
}

// A header that cannot be read at all is skipped and the run moves on
#[test]
fn test_directory_in_place_of_header_is_skipped() {
    let root = setup_temp_project();
    fs::create_dir_all(root.join("Source/Weird.h")).unwrap();
    write_file(&root.join("Source/Foo.h"), FOO_HEADER);

    let report = Migrator::new(&root)
        .targets(["Source/Weird.h", "Source/Foo.h"])
        .run()
        .unwrap();

    assert_eq!(
        report.files[0].outcome.skip_reason(),
        Some(SkipReason::Unreadable)
    );
    assert!(report.files[1].outcome.is_converted());
    assert_eq!(report.converted, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(
        fs::read_to_string(root.join("Source/Foo.h")).unwrap(),
        FOO_EXPECTED
    );
}

// Custom vocabulary from reflmig.toml drives the whole pipeline
#[test]
fn test_config_driven_run() {
    let root = setup_temp_project();
    write_file(
        &root.join(CONFIG_FILE_NAME),
        "targets = [\"Source/Actor.h\"]\n\n[macros]\nlegacy = \"DECLARE_ACTOR\"\nannotation = \"UACTOR\"\n",
    );
    write_file(
        &root.join("Source/Actor.h"),
        "#include \"Actor.h\"\nclass AFoo : public AActor\n{\n\tDECLARE_ACTOR(AFoo, AActor)\n};\n",
    );

    let config = load_config(&root).unwrap().unwrap();
    let report = Migrator::new(&root).with_config(&config).run().unwrap();
    assert_eq!(report.converted, 1);

    let content = fs::read_to_string(root.join("Source/Actor.h")).unwrap();
    assert_eq!(
        content,
        "#include \"Actor.h\"\n#include \"AFoo.generated.h\"\nUACTOR()\nclass AFoo : public AActor\n{\n\tGENERATED_REFLECTION_BODY()\n};\n"
    );
}

// Whole built-in table against a project that has only some of the files
#[test]
fn test_default_table_on_sparse_project() {
    let root = setup_temp_project();
    write_file(
        &root.join("Source/Runtime/Renderer/QuadManager.h"),
        "#pragma once\n#include \"Object.h\"\n\nclass UQuadManager : public UObject\n{\npublic:\n\tDECLARE_CLASS(UQuadManager, UObject)\n\tDECLARE_DUPLICATE(UQuadManager)\n\n\tUQuadManager();\n};\n",
    );

    let report = Migrator::new(&root).run().unwrap();
    assert_eq!(report.files.len(), DEFAULT_TARGETS.len());
    assert_eq!(report.converted, 1);
    assert_eq!(report.skipped, DEFAULT_TARGETS.len() - 1);
    assert!(report
        .files
        .iter()
        .filter(|f| !f.outcome.is_converted())
        .all(|f| f.outcome.skip_reason() == Some(SkipReason::NotFound)));

    let content =
        fs::read_to_string(root.join("Source/Runtime/Renderer/QuadManager.h")).unwrap();
    assert_eq!(
        content,
        "#pragma once\n#include \"Object.h\"\n#include \"UQuadManager.generated.h\"\n\nUCLASS()\nclass UQuadManager : public UObject\n{\npublic:\n\tGENERATED_REFLECTION_BODY()\n\tUQuadManager();\n};\n"
    );
}

#[cfg(feature = "discover")]
#[test]
fn test_discover_then_migrate() {
    let root = setup_temp_project();
    write_file(&root.join("Source/Game/Foo.h"), FOO_HEADER);
    write_file(&root.join("Source/Game/Plain.h"), "struct FPlain {};\n");

    let rewriter = rewriter();
    let found = discover_candidates(&root, &rewriter, &default_excludes()).unwrap();
    assert_eq!(found, vec!["Source/Game/Foo.h"]);

    let report = Migrator::new(&root).targets(found).run().unwrap();
    assert_eq!(report.converted, 1);
    assert!(discover_candidates(&root, &rewriter, &default_excludes())
        .unwrap()
        .is_empty());
}
