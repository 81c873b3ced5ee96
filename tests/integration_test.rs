#[cfg(test)]
mod tests {
    use changelog::{
        ChangeEntry, ChangelogConfig, ChangelogDocument, ChangelogError, HeadingStyle, MigrationStats,
        MoveOptions, SyncOptions, SyncOrchestrator, SyncStatus, VersionId, compute_changes,
    };
    use changelog_sync_tests::{GitFixture, StaticPackages};
    use rstest::rstest;
    use version::Version;

    const SDK_BRANCH_CHANGELOG: &str = "# Changelog

## Unpublished

### 🛠 Breaking changes

### 🎉 New features

### 🐛 Bug fixes

### 💡 Others

## 1.2.0 — 2023-02-01

### 🐛 Bug fixes

- Fixed X

## 1.1.0 — 2023-01-01

### 🐛 Bug fixes

- Fixed V.
";

    const MAIN_BRANCH_CHANGELOG: &str = "# Changelog

## Unpublished

### 🛠 Breaking changes

### 🎉 New features

### 🐛 Bug fixes

### 💡 Others

## 1.1.0 — 2023-01-01

### 🐛 Bug fixes

- Fixed V.
";

    fn id(text: &str) -> VersionId {
        VersionId::parse(text).unwrap()
    }

    fn published_order(document: &ChangelogDocument) -> Vec<String> {
        document
            .published_sections()
            .map(|section| section.id().to_string())
            .collect()
    }

    #[test]
    fn test_diff_and_merge_scenario() {
        let source = ChangelogDocument::parse(SDK_BRANCH_CHANGELOG).unwrap();
        let mut target = ChangelogDocument::parse(MAIN_BRANCH_CHANGELOG).unwrap();

        let after = target.last_published_version().unwrap().clone();
        let upto = source.last_published_version().unwrap().clone();
        assert!(Version::gt(&upto, &after));

        let changes = compute_changes(&source, &after, &upto).unwrap();
        assert_eq!(changes.total_count(), 1);
        assert_eq!(changes.versions().len(), 1);
        let fixes = changes.entries(&id("1.2.0"), "🐛 Bug fixes");
        assert_eq!(fixes, [ChangeEntry::new("Fixed X")]);

        for (version, category, entry) in changes.iter_entries() {
            target
                .insert_entry(
                    &version.version,
                    category,
                    entry,
                    MoveOptions {
                        release_date: version.date,
                    },
                )
                .unwrap();
        }

        assert_eq!(published_order(&target), ["1.2.0", "1.1.0"]);
        assert_eq!(target.unreleased().unwrap().entry_count(), 0);
        assert_eq!(target.unreleased().unwrap().categories().len(), 4);
        assert_eq!(target.serialize(), SDK_BRANCH_CHANGELOG);
    }

    #[test]
    fn test_orchestrator_over_git_branch() {
        let fixture = GitFixture::new();
        fixture.publish_branch(
            "sdk-48",
            &[
                ("packages/expo-image/CHANGELOG.md", SDK_BRANCH_CHANGELOG),
                ("packages/expo-camera/CHANGELOG.md", SDK_BRANCH_CHANGELOG),
            ],
        );
        fixture.write("packages/expo-image/CHANGELOG.md", MAIN_BRANCH_CHANGELOG);
        // expo-camera already matches the branch

        let vcs = fixture.vcs();
        let packages = StaticPackages::in_fixture(&fixture, &["expo-image", "expo-camera"]);
        let orchestrator = SyncOrchestrator::new(&vcs, &packages, ChangelogConfig::default());
        let options = SyncOptions::new("origin", "sdk-48");

        let summary = orchestrator.run(&options).unwrap();
        assert_eq!(summary.updated(), 1);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(summary.failed(), 0);
        assert_eq!(summary.reports[1].package, "expo-image");
        assert_eq!(
            summary.reports[1].outcome.as_ref().unwrap(),
            &SyncStatus::Updated(MigrationStats {
                moved: 0,
                inserted: 1,
            })
        );
        assert_eq!(fixture.read("packages/expo-image/CHANGELOG.md"), SDK_BRANCH_CHANGELOG);

        let summary = orchestrator.run(&options).unwrap();
        assert_eq!(summary.unchanged(), 2);
    }

    #[test]
    fn test_missing_branch_or_file_is_reported_per_package() {
        let fixture = GitFixture::new();
        fixture.publish_branch("sdk-48", &[("packages/expo-image/CHANGELOG.md", SDK_BRANCH_CHANGELOG)]);
        fixture.write("packages/expo-image/CHANGELOG.md", MAIN_BRANCH_CHANGELOG);
        fixture.write("packages/expo-video/CHANGELOG.md", MAIN_BRANCH_CHANGELOG);

        let vcs = fixture.vcs();
        let packages = StaticPackages::in_fixture(&fixture, &["expo-video", "expo-image"]);
        let orchestrator = SyncOrchestrator::new(&vcs, &packages, ChangelogConfig::default());

        let summary = orchestrator.run(&SyncOptions::new("origin", "sdk-48")).unwrap();
        let failures: Vec<(&str, String)> = summary
            .failures()
            .map(|(name, err)| (name, err.to_string()))
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "expo-video");
        assert!(failures[0].1.contains("not found at origin/sdk-48"));
        assert_eq!(summary.updated(), 1);

        let summary = orchestrator.run(&SyncOptions::new("origin", "sdk-49")).unwrap();
        assert_eq!(summary.failed(), 2);
        assert!(
            summary
                .failures()
                .all(|(_, err)| matches!(err, ChangelogError::WithContext(_, inner) if matches!(**inner, ChangelogError::NotFound { .. })))
        );
    }

    #[test]
    fn test_keep_a_changelog_format_is_preserved() {
        let source = "# Changelog

All notable changes to this project will be documented in this file.

## [Unreleased]

## [2.0.0] - 2023-03-01

### Breaking changes

- Removed the legacy API.

### Fixed

- Fixed crash on start.

## [1.0.0] - 2023-01-01

### Added

- Initial release.
";
        let target = "# Changelog

All notable changes to this project will be documented in this file.

## [Unreleased]

### Fixed

- Fixed crash on start.

## [1.0.0] - 2023-01-01

### Added

- Initial release.
";
        let fixture = GitFixture::new();
        fixture.publish_branch("release-2", &[("packages/lib/CHANGELOG.md", source)]);
        fixture.write("packages/lib/CHANGELOG.md", target);

        let vcs = fixture.vcs();
        let packages = StaticPackages::in_fixture(&fixture, &["lib"]);
        SyncOrchestrator::new(&vcs, &packages, ChangelogConfig::default())
            .run(&SyncOptions::new("origin", "release-2"))
            .unwrap();

        let merged = fixture.read("packages/lib/CHANGELOG.md");
        assert_eq!(
            merged,
            "# Changelog

All notable changes to this project will be documented in this file.

## [Unreleased]

## [2.0.0] - 2023-03-01

### Breaking changes

- Removed the legacy API.

### Fixed

- Fixed crash on start.

## [1.0.0] - 2023-01-01

### Added

- Initial release.
"
        );
        assert_eq!(
            ChangelogDocument::parse(&merged).unwrap().heading_style(),
            HeadingStyle::Bracketed
        );
    }

    #[test]
    fn test_regression_is_reported_and_file_untouched() {
        let fixture = GitFixture::new();
        fixture.publish_branch("sdk-47", &[("packages/expo-image/CHANGELOG.md", MAIN_BRANCH_CHANGELOG)]);
        fixture.write("packages/expo-image/CHANGELOG.md", SDK_BRANCH_CHANGELOG);

        let vcs = fixture.vcs();
        let packages = StaticPackages::in_fixture(&fixture, &["expo-image"]);
        let summary = SyncOrchestrator::new(&vcs, &packages, ChangelogConfig::default())
            .run(&SyncOptions::new("origin", "sdk-47"))
            .unwrap();

        let (_, err) = summary.failures().next().unwrap();
        assert!(err.needs_manual_resolution());
        assert!(err.user_message().contains("Please update manually"));
        assert_eq!(fixture.read("packages/expo-image/CHANGELOG.md"), SDK_BRANCH_CHANGELOG);
    }

    #[rstest]
    #[case::multiple_versions(&["1.3.0", "1.2.1", "1.2.0"], "1.1.0")]
    #[case::prereleases(&["2.0.0", "2.0.0-rc.1", "1.2.0"], "1.1.0")]
    #[case::gap_in_target(&["1.3.0"], "1.1.0")]
    fn test_merged_sections_stay_descending(#[case] new_versions: &[&str], #[case] base: &str) {
        let mut source = String::from("# Changelog\n\n## Unpublished\n\n");
        for version in new_versions {
            source.push_str(&format!("## {version}\n\n### 💡 Others\n\n- Released {version}.\n\n"));
        }
        source.push_str(&format!("## {base}\n\n### 💡 Others\n\n- Released {base}.\n"));
        let target = format!("# Changelog\n\n## Unpublished\n\n## {base}\n\n### 💡 Others\n\n- Released {base}.\n");

        let fixture = GitFixture::new();
        fixture.publish_branch("sdk", &[("packages/pkg/CHANGELOG.md", source.as_str())]);
        fixture.write("packages/pkg/CHANGELOG.md", &target);

        let vcs = fixture.vcs();
        let packages = StaticPackages::in_fixture(&fixture, &["pkg"]);
        SyncOrchestrator::new(&vcs, &packages, ChangelogConfig::default())
            .run(&SyncOptions::new("origin", "sdk"))
            .unwrap();

        let merged = ChangelogDocument::parse(&fixture.read("packages/pkg/CHANGELOG.md")).unwrap();
        let mut expected: Vec<String> = new_versions.iter().map(ToString::to_string).collect();
        expected.push(base.to_string());
        assert_eq!(published_order(&merged), expected);
        assert_eq!(merged.serialize(), source);

        for version in new_versions {
            assert!(merged.contains_entry(&id(version), "💡 Others", &format!("Released {version}.")));
        }
    }

    #[test]
    fn test_untouched_document_round_trips() {
        let content = "# Changelog\r\n\r\n## [Unreleased]\r\n\r\n### Fixed\r\n\r\n- A fix\r\n  spanning two lines.\r\n\r\n## [1.0.0] - 2023-01-01\r\n\r\n_Initial release._\r\n";
        let document = ChangelogDocument::parse(content).unwrap();
        assert_eq!(document.serialize(), content);

        let fixes = document.unreleased().unwrap().category("Bug fixes").unwrap();
        assert_eq!(fixes.entries()[0].details(), ["  spanning two lines."]);
    }
}
