//! Behaviour-driven tests for package assembly.
//!
//! Each scenario builds a scratch Magento tree, writes a connect descriptor
//! from the rules collected by the steps, and runs the manifest builder and
//! archiver against it. Tests use the rstest-bdd v0.5.0 mutable world
//! pattern.

use connect_packager::fingerprint::compute_fingerprint;
use connect_packager::{
    ArchiveOptions, ArchiveOutput, BuildStamp, Fingerprint, ManifestNode, PackageManifest,
    PackagerError, Packager, RecordingReporter, build_tarball,
};
use flate2::read::GzDecoder;
use log::Level;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

struct RuleRow {
    target: String,
    path: String,
    kind: &'static str,
    include: String,
    ignore: String,
}

#[derive(Default)]
struct PackagingWorld {
    temp_dir: Option<TempDir>,
    channel: String,
    authors: Vec<[String; 3]>,
    rules: Vec<RuleRow>,
    reporter: RecordingReporter,
    manifest: Option<PackageManifest>,
    output: Option<ArchiveOutput>,
    error: Option<PackagerError>,
    fingerprints: Option<(Fingerprint, Fingerprint)>,
}

#[fixture]
fn world() -> PackagingWorld {
    PackagingWorld {
        temp_dir: Some(TempDir::new().expect("temp dir")),
        ..PackagingWorld::default()
    }
}

fn root(world: &PackagingWorld) -> PathBuf {
    world
        .temp_dir
        .as_ref()
        .expect("temp_dir set")
        .path()
        .to_path_buf()
}

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

/// Render the collected steps as a connect descriptor.
fn connect_xml(world: &PackagingWorld) -> String {
    fn column(name: &str, values: impl Iterator<Item = String>) -> String {
        let items: String = values.map(|value| format!("<{name}>{value}</{name}>")).collect();
        format!("<{name}>{items}</{name}>")
    }

    let authors = [
        column("name", world.authors.iter().map(|[name, _, _]| name.clone())),
        column("user", world.authors.iter().map(|[_, user, _]| user.clone())),
        column("email", world.authors.iter().map(|[_, _, email]| email.clone())),
    ]
    .concat();
    let contents = [
        column("target", world.rules.iter().map(|rule| rule.target.clone())),
        column("path", world.rules.iter().map(|rule| rule.path.clone())),
        column("type", world.rules.iter().map(|rule| rule.kind.to_owned())),
        column("include", world.rules.iter().map(|rule| rule.include.clone())),
        column("ignore", world.rules.iter().map(|rule| rule.ignore.clone())),
    ]
    .concat();

    format!(
        "<_><name>Foo_Bar</name><channel>{}</channel><stability>stable</stability>\
         <license>OSL</license><summary>Bars</summary><description>Adds bars</description>\
         <notes>First release</notes><authors>{authors}</authors><contents>{contents}</contents>\
         <depends_php_min>5.2.0</depends_php_min><depends_php_max>7.4.99</depends_php_max></_>",
        world.channel
    )
}

fn manifest(world: &PackagingWorld) -> &PackageManifest {
    world.manifest.as_ref().expect("manifest built")
}

/// Slash-separated paths of every node under `target`, in manifest order.
fn target_paths(world: &PackagingWorld, target: &str) -> Vec<(String, ManifestNode)> {
    let root = manifest(world)
        .contents
        .iter()
        .find(|root| root.target.as_str() == target)
        .unwrap_or_else(|| panic!("no {target} target in manifest"));
    let mut paths = Vec::new();
    root.visit(|path, node| paths.push((path.to_owned(), node.clone())));
    paths
}

fn archive_entries(world: &PackagingWorld) -> Vec<String> {
    let output = world.output.as_ref().expect("archive built");
    let file = fs::File::open(&output.archive_path).expect("open archive");
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive
        .entries()
        .expect("entries")
        .map(|entry| {
            let entry = entry.expect("entry");
            let path = entry.path().expect("path").to_string_lossy().into_owned();
            path.trim_end_matches('/').to_owned()
        })
        .collect()
}

fn archive_path(world: &PackagingWorld) -> PathBuf {
    root(world).join("build/Foo_Bar-1.0.0.tgz")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a Magento tree with module \"{name}\" in code pool \"{pool}\"")]
fn given_module(world: &mut PackagingWorld, name: String, pool: String) {
    let root = root(world);
    write_file(
        &root.join(format!("app/etc/modules/{name}.xml")),
        &format!(
            "<config><modules><{name}><active>true</active><codePool>{pool}</codePool>\
             </{name}></modules></config>"
        ),
    );
    write_module_config(&root, &name, &pool);
}

fn write_module_config(root: &Path, name: &str, pool: &str) {
    let (namespace, module) = name.split_once('_').expect("Namespace_Module");
    write_file(
        &root.join(format!("app/code/{pool}/{namespace}/{module}/etc/config.xml")),
        &format!("<config><modules><{name}><version>1.0.0</version></{name}></modules></config>"),
    );
}

#[given("the module \"{name}\" also has a config in code pool \"{pool}\"")]
fn given_module_config(world: &mut PackagingWorld, name: String, pool: String) {
    write_module_config(&root(world), &name, &pool);
}

#[given("a connect descriptor with channel \"{channel}\"")]
fn given_channel(world: &mut PackagingWorld, channel: String) {
    world.channel = channel;
}

#[given("the module file \"{path}\" containing \"{body}\"")]
fn given_module_file(world: &mut PackagingWorld, path: String, body: String) {
    write_file(&root(world).join(path), &body);
}

#[given("author \"{name}\" with user \"{user}\" and email \"{email}\"")]
fn given_author(world: &mut PackagingWorld, name: String, user: String, email: String) {
    world.authors.push([name, user, email]);
}

#[given("a dir rule for target \"{target}\" at \"{path}\" including \"{include}\"")]
fn given_dir_rule(world: &mut PackagingWorld, target: String, path: String, include: String) {
    world.rules.push(RuleRow {
        target,
        path,
        kind: "dir",
        include,
        ignore: String::new(),
    });
}

#[given(
    "a filtered dir rule for target \"{target}\" at \"{path}\" including \"{include}\" except \"{ignore}\""
)]
fn given_filtered_dir_rule(
    world: &mut PackagingWorld,
    target: String,
    path: String,
    include: String,
    ignore: String,
) {
    world.rules.push(RuleRow {
        target,
        path,
        kind: "dir",
        include,
        ignore,
    });
}

#[given("a file rule for target \"{target}\" at \"{path}\"")]
fn given_file_rule(world: &mut PackagingWorld, target: String, path: String) {
    world.rules.push(RuleRow {
        target,
        path,
        kind: "file",
        include: String::new(),
        ignore: String::new(),
    });
}

#[when("the package is built")]
fn when_package_built(world: &mut PackagingWorld) {
    let root = root(world);
    let connect_path = root.join("var/connect/Foo_Bar.xml");
    write_file(&connect_path, &connect_xml(world));

    let stamp = BuildStamp {
        date: "2026-10-16".to_owned(),
        time: "10:00:00".to_owned(),
    };
    let result = Packager::new(&root, &world.reporter)
        .with_stamp(stamp)
        .build_manifest(&connect_path)
        .and_then(|manifest| {
            let output =
                build_tarball(&manifest, &root, &ArchiveOptions::default(), &world.reporter)?;
            Ok((manifest, output))
        });

    match result {
        Ok((manifest, output)) => {
            world.manifest = Some(manifest);
            world.output = Some(output);
        }
        Err(err) => world.error = Some(err),
    }
}

#[when("the files \"{first}\" and \"{second}\" are fingerprinted")]
fn when_fingerprinted(world: &mut PackagingWorld, first: String, second: String) {
    let root = root(world);
    world.fingerprints = Some((
        compute_fingerprint(&root.join(first)).expect("first fingerprint"),
        compute_fingerprint(&root.join(second)).expect("second fingerprint"),
    ));
}

#[then("the build succeeds")]
fn then_build_succeeds(world: &mut PackagingWorld) {
    assert!(world.error.is_none(), "unexpected error: {:?}", world.error);
    assert!(world.manifest.is_some(), "manifest must be built");
}

#[then("the manifest authors are \"{names}\"")]
fn then_authors(world: &mut PackagingWorld, names: String) {
    let actual: Vec<&str> = manifest(world)
        .authors
        .iter()
        .map(|author| author.name.as_str())
        .collect();
    let expected: Vec<&str> = names.split(", ").collect();
    assert_eq!(actual, expected);
}

#[then("the \"{target}\" target holds \"{paths}\"")]
fn then_target_holds(world: &mut PackagingWorld, target: String, paths: String) {
    let actual: Vec<String> = target_paths(world, &target)
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    let expected: Vec<&str> = paths.split(", ").collect();
    assert_eq!(actual, expected);
}

#[then("the \"{target}\" target nests \"{path}\" with the fingerprint of \"{body}\"")]
fn then_target_nests(world: &mut PackagingWorld, target: String, path: String, body: String) {
    let nodes = target_paths(world, &target);
    let (_, node) = nodes
        .iter()
        .find(|(candidate, _)| *candidate == path)
        .unwrap_or_else(|| panic!("{path} not in {target}"));
    assert_eq!(
        node,
        &ManifestNode::File {
            name: path.rsplit('/').next().expect("file name").to_owned(),
            fingerprint: Fingerprint::of_bytes(body.as_bytes()),
        }
    );
}

#[then("the \"{target}\" target does not hold \"{path}\"")]
fn then_target_lacks(world: &mut PackagingWorld, target: String, path: String) {
    assert!(
        target_paths(world, &target)
            .iter()
            .all(|(candidate, _)| *candidate != path),
        "{path} must not be in {target}"
    );
}

#[then("the archive contains \"{path}\"")]
fn then_archive_contains(world: &mut PackagingWorld, path: String) {
    let entries = archive_entries(world);
    assert!(entries.contains(&path), "{path} missing from {entries:?}");
}

#[then("the archive does not contain \"{path}\"")]
fn then_archive_lacks(world: &mut PackagingWorld, path: String) {
    let entries = archive_entries(world);
    assert!(!entries.contains(&path), "{path} unexpectedly in {entries:?}");
}

#[then("the archive file exists")]
fn then_archive_exists(world: &mut PackagingWorld) {
    let output = world.output.as_ref().expect("archive built");
    assert_eq!(output.archive_path, archive_path(world));
    assert!(output.archive_path.is_file());
}

#[then("no archive file exists")]
fn then_no_archive(world: &mut PackagingWorld) {
    assert!(!archive_path(world).exists());
}

#[then("a warning mentions \"{text}\"")]
fn then_warning(world: &mut PackagingWorld, text: String) {
    let warnings = world.reporter.at_level(Level::Warn);
    assert!(
        warnings.iter().any(|warning| warning.contains(&text)),
        "no warning containing {text:?} in {warnings:?}"
    );
}

#[then("the build fails with an unknown target error")]
fn then_unknown_target(world: &mut PackagingWorld) {
    assert!(
        matches!(world.error, Some(PackagerError::UnknownTarget { .. })),
        "expected UnknownTarget, got {:?}",
        world.error
    );
}

#[then("the build fails reading \"{path}\"")]
fn then_read_failure(world: &mut PackagingWorld, path: String) {
    let expected = root(world).join(path);
    assert!(
        matches!(&world.error, Some(PackagerError::ReadFile { path, .. }) if *path == expected),
        "expected ReadFile for {}, got {:?}",
        expected.display(),
        world.error
    );
}

#[then("the fingerprints are equal")]
fn then_fingerprints_equal(world: &mut PackagingWorld) {
    let (first, second) = world.fingerprints.as_ref().expect("fingerprints computed");
    assert_eq!(first, second);
}

#[then("the fingerprints differ")]
fn then_fingerprints_differ(world: &mut PackagingWorld) {
    let (first, second) = world.fingerprints.as_ref().expect("fingerprints computed");
    assert_ne!(first, second);
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Authors keep descriptor order"
)]
fn scenario_author_order(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Only entries passing the include pattern become leaves"
)]
fn scenario_include_filter(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Ignored entries are left out"
)]
fn scenario_ignore_filter(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "End-to-end tree for a directory rule"
)]
fn scenario_end_to_end_tree(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Rules sharing a parent share one directory node"
)]
fn scenario_shared_parent(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Channel and code pool mismatch only warns"
)]
fn scenario_channel_mismatch(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Module version is read from the channel's code pool"
)]
fn scenario_channel_pool_lookup(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Unknown targets fail the build"
)]
fn scenario_unknown_target(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Fingerprints depend only on content"
)]
fn scenario_fingerprints(world: PackagingWorld) {
    let _ = world;
}
