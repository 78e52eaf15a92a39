//! `DieselMembershipRepository` against embedded PostgreSQL.

use foodgram::domain::ports::{MembershipRepository, MembershipRepositoryError};
use foodgram::domain::{MembershipKind, RecipeId, UserId};
use foodgram::outbound::persistence::DieselMembershipRepository;
use rstest::{fixture, rstest};

#[path = "support/pg_embed.rs"]
#[allow(dead_code)]
mod pg_embed;

use pg_embed::{FLOUR, TestDatabase};

struct MembershipWorld {
    db: TestDatabase,
    repository: DieselMembershipRepository,
    eater: UserId,
    recipe: RecipeId,
}

#[fixture]
fn world() -> Option<MembershipWorld> {
    let db = pg_embed::test_database()?;
    db.seed_catalogue();
    let chef = db.create_user("chef");
    let eater = db.create_user("eater");
    let recipe = db.create_recipe(&chef, "Bread", vec![(FLOUR, 500)]);
    let repository = DieselMembershipRepository::new(db.pool.clone());
    Some(MembershipWorld {
        db,
        repository,
        eater,
        recipe,
    })
}

#[rstest]
#[case(MembershipKind::Favorite)]
#[case(MembershipKind::Cart)]
fn add_and_remove_report_changes(world: Option<MembershipWorld>, #[case] kind: MembershipKind) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: add_and_remove_report_changes skipped");
        return;
    };
    let rt = &world.db.runtime;
    let repo = &world.repository;

    assert!(rt.block_on(repo.add(kind, &world.eater, world.recipe)).expect("add"));
    assert!(!rt.block_on(repo.add(kind, &world.eater, world.recipe)).expect("re-add"));
    assert_eq!(
        rt.block_on(repo.members_among(kind, &world.eater, &[world.recipe, RecipeId::new(9_999)]))
            .expect("members"),
        vec![world.recipe]
    );
    assert!(rt.block_on(repo.remove(kind, &world.eater, world.recipe)).expect("remove"));
    assert!(!rt.block_on(repo.remove(kind, &world.eater, world.recipe)).expect("re-remove"));
}

#[rstest]
fn favorites_and_cart_are_separate(world: Option<MembershipWorld>) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: favorites_and_cart_are_separate skipped");
        return;
    };
    let rt = &world.db.runtime;
    let repo = &world.repository;
    rt.block_on(repo.add(MembershipKind::Favorite, &world.eater, world.recipe))
        .expect("favorite");

    let in_cart = rt
        .block_on(repo.members_among(MembershipKind::Cart, &world.eater, &[world.recipe]))
        .expect("cart");

    assert!(in_cart.is_empty());
}

#[rstest]
#[case(MembershipKind::Favorite)]
#[case(MembershipKind::Cart)]
fn missing_recipe_is_unknown(world: Option<MembershipWorld>, #[case] kind: MembershipKind) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: missing_recipe_is_unknown skipped");
        return;
    };

    let err = world
        .db
        .runtime
        .block_on(world.repository.add(kind, &world.eater, RecipeId::new(9_999)))
        .expect_err("foreign key");

    assert_eq!(err, MembershipRepositoryError::UnknownRecipe);
}
