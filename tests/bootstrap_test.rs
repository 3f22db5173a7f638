//! Bootstrap sequence integration tests against in-memory SQLite.

mod common;

use futures::future::join_all;

use common::{config_with, file_db, memory_db, Scratch};
use fielddb::config::STORAGE_SUBDIRECTORIES;
use fielddb::domain::language::{BUNDLED_ISO_639_3, BUNDLED_ISO_639_3_ROWS};
use fielddb::domain::{parse_iso_639_3, Language, Password, UserRole};
use fielddb::errors::BootstrapError;
use fielddb::infra::{
    LanguageRepository, MarkerClaim, MarkerRepository, TagRepository, UnitOfWork, UserRepository,
};
use fielddb::services::{bootstrap, BootstrapOutcome, Bootstrapper};

fn bundled_language_count() -> u64 {
    parse_iso_639_3(BUNDLED_ISO_639_3).unwrap().len() as u64
}

#[tokio::test]
async fn test_fresh_database_is_fully_seeded() {
    let scratch = Scratch::new("seed");
    let config = scratch.config(&[]);
    let db = memory_db().await;
    let conn = db.connection();

    let outcome = Bootstrapper::new(conn, &config).run().await.unwrap();

    let BootstrapOutcome::Seeded(summary) = outcome else {
        panic!("expected a seeding run, got {:?}", outcome);
    };
    assert_eq!(summary.users, 3);
    assert_eq!(summary.tags, 2);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.languages, bundled_language_count());
    assert_eq!(summary.languages, BUNDLED_ISO_639_3_ROWS as u64);

    let users = UserRepository::new(conn).list().await.unwrap();
    let roles: Vec<(String, UserRole)> = users
        .iter()
        .map(|u| (u.username.clone(), u.role))
        .collect();
    assert!(roles.contains(&("admin".to_string(), UserRole::Administrator)));
    assert!(roles.contains(&("contributor".to_string(), UserRole::Contributor)));
    assert!(roles.contains(&("viewer".to_string(), UserRole::Viewer)));

    let tags: Vec<String> = TagRepository::new(conn)
        .list_tags()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert!(tags.contains(&"restricted".to_string()));
    assert!(tags.contains(&"foreign word".to_string()));
    assert_eq!(TagRepository::new(conn).count_pages().await.unwrap(), 2);

    assert_eq!(
        LanguageRepository::new(conn).count().await.unwrap(),
        bundled_language_count()
    );
    assert!(MarkerRepository::new(conn).is_set().await.unwrap());

    for sub in STORAGE_SUBDIRECTORIES {
        assert!(config.storage_root.join(sub).is_dir(), "{} missing", sub);
    }
}

#[tokio::test]
async fn test_default_passwords_verify() {
    let scratch = Scratch::new("passwords");
    let config = scratch.config(&[]);
    let db = memory_db().await;

    Bootstrapper::new(db.connection(), &config).run().await.unwrap();

    let admin = UserRepository::new(db.connection())
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    let hash = Password::from_hash(admin.password_hash.clone());
    assert!(hash.verify("adminA_1"));
    assert!(!hash.verify("adminA_2"));
    assert_eq!(admin.email.as_deref(), Some(config.admin_email.as_str()));
}

#[tokio::test]
async fn test_second_run_is_noop() {
    let scratch = Scratch::new("idempotent");
    let config = scratch.config(&[]);
    let db = memory_db().await;
    let conn = db.connection();

    let first = Bootstrapper::new(conn, &config).run().await.unwrap();
    assert!(matches!(first, BootstrapOutcome::Seeded(_)));
    let marker_before = MarkerRepository::new(conn).get().await.unwrap().unwrap();

    let second = Bootstrapper::new(conn, &config).run().await.unwrap();
    assert_eq!(second, BootstrapOutcome::AlreadyBootstrapped);

    assert_eq!(UserRepository::new(conn).count().await.unwrap(), 3);
    assert_eq!(TagRepository::new(conn).list_tags().await.unwrap().len(), 2);
    assert_eq!(
        LanguageRepository::new(conn).count().await.unwrap(),
        bundled_language_count()
    );
    let marker_after = MarkerRepository::new(conn).get().await.unwrap().unwrap();
    assert_eq!(marker_before.completed_at, marker_after.completed_at);
}

#[tokio::test]
async fn test_non_empty_language_table_is_precondition_error() {
    let scratch = Scratch::new("precondition");
    let config = scratch.config(&[]);
    let db = memory_db().await;
    let conn = db.connection();

    let existing = Language {
        id: "zzz".to_string(),
        part2b: String::new(),
        part2t: String::new(),
        part1: String::new(),
        scope: "I".to_string(),
        language_type: "L".to_string(),
        ref_name: "Preloaded".to_string(),
        comment: String::new(),
    };
    let uow = UnitOfWork::begin(conn).await.unwrap();
    uow.languages().insert_all(&[existing]).await.unwrap();
    uow.commit().await.unwrap();

    let result = Bootstrapper::new(conn, &config).run().await;

    assert!(matches!(result, Err(BootstrapError::Precondition(_))));
    assert!(!MarkerRepository::new(conn).is_set().await.unwrap());
    assert_eq!(UserRepository::new(conn).count().await.unwrap(), 0);
    assert_eq!(LanguageRepository::new(conn).count().await.unwrap(), 1);
    assert!(!config.storage_root.exists());
}

#[tokio::test]
async fn test_storage_failure_rolls_back_seed_data() {
    let scratch = Scratch::new("atomic");
    let blocker = scratch.root.join("plain-file");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let config = config_with(&blocker.join("store").display().to_string(), &[]);
    let db = memory_db().await;
    let conn = db.connection();

    let result = Bootstrapper::new(conn, &config).run().await;

    assert!(matches!(result, Err(BootstrapError::Storage { .. })));
    assert!(!MarkerRepository::new(conn).is_set().await.unwrap());
    assert_eq!(UserRepository::new(conn).count().await.unwrap(), 0);
    assert_eq!(LanguageRepository::new(conn).count().await.unwrap(), 0);

    // Once the obstacle is gone the next start seeds normally
    std::fs::remove_file(&blocker).unwrap();
    let retry = Bootstrapper::new(conn, &config).run().await.unwrap();
    assert!(matches!(retry, BootstrapOutcome::Seeded(_)));
}

#[tokio::test]
async fn test_concurrent_runs_seed_once() {
    let scratch = Scratch::new("race");
    let config = scratch.config(&[]);
    let db = memory_db().await;
    let conn = db.connection();

    let outcomes = join_all((0..4).map(|_| {
        let config = &config;
        async move { Bootstrapper::new(conn, config).run().await }
    }))
    .await;

    let seeded = outcomes
        .iter()
        .filter(|o| matches!(o, Ok(BootstrapOutcome::Seeded(_))))
        .count();
    let skipped = outcomes
        .iter()
        .filter(|o| matches!(o, Ok(BootstrapOutcome::AlreadyBootstrapped)))
        .count();
    assert_eq!(seeded, 1);
    assert_eq!(skipped, 3);
    assert_eq!(UserRepository::new(conn).count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_empty_database_seeds_only_languages() {
    let scratch = Scratch::new("empty");
    let config = scratch.config(&[("EMPTY_DATABASE", "1")]);
    let db = memory_db().await;
    let conn = db.connection();

    let outcome = Bootstrapper::new(conn, &config).run().await.unwrap();

    assert!(matches!(outcome, BootstrapOutcome::Seeded(_)));
    assert_eq!(UserRepository::new(conn).count().await.unwrap(), 0);
    assert!(TagRepository::new(conn).list_tags().await.unwrap().is_empty());
    assert_eq!(
        LanguageRepository::new(conn).count().await.unwrap(),
        bundled_language_count()
    );

    let marker = MarkerRepository::new(conn).get().await.unwrap().unwrap();
    assert!(!marker.seeded_defaults);
}

#[tokio::test]
async fn test_language_data_can_be_skipped() {
    let scratch = Scratch::new("nolang");
    let config = scratch.config(&[("ADD_LANGUAGE_DATA", "false")]);
    let db = memory_db().await;
    let conn = db.connection();

    Bootstrapper::new(conn, &config).run().await.unwrap();

    assert_eq!(LanguageRepository::new(conn).count().await.unwrap(), 0);
    assert_eq!(UserRepository::new(conn).count().await.unwrap(), 3);
    assert_eq!(
        MarkerRepository::new(conn).get().await.unwrap().unwrap().languages_seeded,
        0
    );
}

#[tokio::test]
async fn test_language_file_overrides_bundled_table() {
    let scratch = Scratch::new("langfile");
    let path = scratch.root.join("iso.tab");
    std::fs::write(
        &path,
        "Id\tPart2B\tPart2T\tPart1\tScope\tLanguage_Type\tRef_Name\tComment\n\
         aaa\t\t\t\tI\tL\tGhotuo\t\n\
         eng\teng\teng\ten\tI\tL\tEnglish\t\n",
    )
    .unwrap();
    let config = scratch.config(&[("LANGUAGE_DATA_PATH", &path.display().to_string())]);
    let db = memory_db().await;
    let conn = db.connection();

    Bootstrapper::new(conn, &config).run().await.unwrap();

    let languages = LanguageRepository::new(conn);
    assert_eq!(languages.count().await.unwrap(), 2);
    let english = languages.find_by_id("eng").await.unwrap().unwrap();
    assert_eq!(english.part1, "en");
    assert_eq!(english.ref_name, "English");
}

#[tokio::test]
async fn test_unreadable_language_file_is_seed_data_error() {
    let scratch = Scratch::new("badfile");
    let missing = scratch.root.join("missing.tab").display().to_string();
    let config = scratch.config(&[("LANGUAGE_DATA_PATH", &missing)]);
    let db = memory_db().await;
    let conn = db.connection();

    let result = Bootstrapper::new(conn, &config).run().await;

    assert!(matches!(result, Err(BootstrapError::SeedData(_))));
    assert!(!MarkerRepository::new(conn).is_set().await.unwrap());
}

#[tokio::test]
async fn test_claim_after_commit_is_already_claimed() {
    let db = memory_db().await;
    let conn = db.connection();

    let first = UnitOfWork::begin(conn).await.unwrap();
    assert_eq!(first.marker().claim().await.unwrap(), MarkerClaim::Claimed);
    first.commit().await.unwrap();

    let second = UnitOfWork::begin(conn).await.unwrap();
    assert_eq!(
        second.marker().claim().await.unwrap(),
        MarkerClaim::AlreadyClaimed
    );
    second.rollback().await;
}

#[tokio::test]
async fn test_overlapping_claims_have_one_winner() {
    let scratch = Scratch::new("overlap");
    let db = file_db(&scratch.database_url(), 2).await;
    let conn = db.connection();

    let holder = UnitOfWork::begin(conn).await.unwrap();
    assert_eq!(holder.marker().claim().await.unwrap(), MarkerClaim::Claimed);

    // The second claim runs on another connection while the first
    // transaction is still open, and resolves once it commits
    let (contender, committed) = tokio::join!(
        async {
            let uow = UnitOfWork::begin(conn).await.unwrap();
            let claim = uow.marker().claim().await;
            uow.rollback().await;
            claim
        },
        async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            holder.commit().await
        }
    );

    committed.unwrap();
    assert_eq!(contender.unwrap(), MarkerClaim::AlreadyClaimed);
    assert!(MarkerRepository::new(conn).is_set().await.unwrap());
}

#[tokio::test]
async fn test_oversized_language_count_is_rejected() {
    let db = memory_db().await;
    let conn = db.connection();

    let uow = UnitOfWork::begin(conn).await.unwrap();
    uow.marker().claim().await.unwrap();
    assert!(uow.marker().record(true, u64::MAX).await.is_err());
    uow.rollback().await;

    assert!(!MarkerRepository::new(conn).is_set().await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_processes_on_fresh_database() {
    let scratch = Scratch::new("processes");
    let url = scratch.database_url();
    let config = scratch.config(&[("DATABASE_URL", url.as_str())]);

    // Each task opens its own pool and migrates, as separate processes would
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = config.clone();
            tokio::spawn(async move { bootstrap(&config).await })
        })
        .collect();

    let mut seeded = 0;
    let mut skipped = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(BootstrapOutcome::Seeded(_)) => seeded += 1,
            Ok(BootstrapOutcome::AlreadyBootstrapped) => skipped += 1,
            Err(e) => panic!("concurrent bootstrap failed: {}", e),
        }
    }
    assert_eq!(seeded, 1);
    assert_eq!(skipped, 3);

    let db = file_db(&url, 1).await;
    let conn = db.connection();
    assert_eq!(UserRepository::new(conn).count().await.unwrap(), 3);
    assert_eq!(
        LanguageRepository::new(conn).count().await.unwrap(),
        BUNDLED_ISO_639_3_ROWS as u64
    );
}
