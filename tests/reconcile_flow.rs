#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the link/adopt reconciliation flow against a
//! provisioned-looking isolated environment.

mod common;

use std::collections::BTreeSet;

use common::TestEnvironment;
use ricebox_cli::paths::{DotfilesTree, EnvironmentPaths};
use ricebox_cli::reconcile::{self, ConfigDirState};

fn profile_paths(env: &TestEnvironment, name: &str) -> (EnvironmentPaths, DotfilesTree) {
    (
        EnvironmentPaths::resolve(&env.prefix, name),
        DotfilesTree::resolve(&env.dotfiles_root, name),
    )
}

#[cfg(unix)]
#[test]
fn prepare_then_link_then_relink() {
    let env = TestEnvironment::new();
    let (iso, tree) = profile_paths(&env, "omarchy");

    reconcile::prepare(&tree).unwrap();
    assert!(tree.config.is_dir());
    assert!(tree.data.is_dir());

    reconcile::link_config(&iso.config, &tree, "omarchy").unwrap();
    assert_eq!(reconcile::inspect(&iso.config), ConfigDirState::Linked);

    // Second link: AlreadyLinked, filesystem identical to after call one.
    let err = reconcile::link_config(&iso.config, &tree, "omarchy").unwrap_err();
    assert!(err.to_string().contains("already linked"));
    assert_eq!(std::fs::read_link(&iso.config).unwrap(), tree.config);
}

/// Adopt must move every file byte-identically, then link, with the full
/// name set preserved.
#[cfg(unix)]
#[test]
fn adopt_migrates_a_lived_in_config() {
    let env = TestEnvironment::new();
    let (iso, tree) = profile_paths(&env, "jakoolit");

    // A lived-in isolated .config, as an installer leaves it.
    std::fs::create_dir_all(iso.config.join("hypr")).unwrap();
    std::fs::write(iso.config.join("hypr/hyprland.conf"), b"monitor=eDP-1").unwrap();
    std::fs::create_dir_all(iso.config.join("waybar")).unwrap();
    std::fs::write(iso.config.join("waybar/style.css"), b"* { font-size: 13px }").unwrap();
    std::fs::write(iso.config.join(".gtkrc"), b"gtk-theme").unwrap();

    let names_before: BTreeSet<String> = std::fs::read_dir(&iso.config)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    reconcile::prepare(&tree).unwrap();
    let moved = reconcile::adopt_config(&iso.config, &tree, "jakoolit").unwrap();

    assert_eq!(
        moved.iter().cloned().collect::<BTreeSet<_>>(),
        names_before,
        "every entry, hidden ones included, was moved"
    );
    assert_eq!(reconcile::inspect(&iso.config), ConfigDirState::Linked);
    assert_eq!(
        std::fs::read(tree.config.join("hypr/hyprland.conf")).unwrap(),
        b"monitor=eDP-1"
    );
    assert_eq!(
        std::fs::read(tree.config.join("waybar/style.css")).unwrap(),
        b"* { font-size: 13px }"
    );
    assert_eq!(std::fs::read(tree.config.join(".gtkrc")).unwrap(), b"gtk-theme");

    let names_after: BTreeSet<String> = std::fs::read_dir(&tree.config)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names_before, names_after, "no data loss, just relocation");
}

#[test]
fn adopt_refuses_to_merge_into_tracked_config() {
    let env = TestEnvironment::new();
    let (iso, tree) = profile_paths(&env, "jakoolit");

    std::fs::create_dir_all(&iso.config).unwrap();
    std::fs::write(iso.config.join("fresh.conf"), b"fresh").unwrap();
    std::fs::create_dir_all(&tree.config).unwrap();
    std::fs::write(tree.config.join("tracked.conf"), b"tracked").unwrap();

    let err = reconcile::adopt_config(&iso.config, &tree, "jakoolit").unwrap_err();
    assert!(err.to_string().contains("not empty"));

    // Both directories completely untouched.
    assert_eq!(std::fs::read(iso.config.join("fresh.conf")).unwrap(), b"fresh");
    assert_eq!(
        std::fs::read(tree.config.join("tracked.conf")).unwrap(),
        b"tracked"
    );
    assert!(!tree.config.join("fresh.conf").exists());
    assert!(!iso.config.join("tracked.conf").exists());
}

#[cfg(unix)]
#[test]
fn linked_profile_shares_content_through_the_tree() {
    let env = TestEnvironment::new();
    let (iso, tree) = profile_paths(&env, "omarchy");

    reconcile::prepare(&tree).unwrap();
    reconcile::link_config(&iso.config, &tree, "omarchy").unwrap();

    // A write through the isolated path lands in the dotfiles tree: after
    // linking, the tree is the sole source of truth.
    std::fs::create_dir_all(iso.config.join("nvim")).unwrap();
    std::fs::write(iso.config.join("nvim/init.lua"), b"vim.o.number = true").unwrap();

    assert_eq!(
        std::fs::read(tree.config.join("nvim/init.lua")).unwrap(),
        b"vim.o.number = true"
    );
}

#[test]
fn adopt_on_never_provisioned_profile_fails_cleanly() {
    let env = TestEnvironment::new();
    let (iso, tree) = profile_paths(&env, "ghost");

    let err = reconcile::adopt_config(&iso.config, &tree, "ghost").unwrap_err();
    assert!(err.to_string().contains("link-config ghost"), "remedial command named");
    assert!(!tree.config.exists(), "nothing created on the failure path");
}
