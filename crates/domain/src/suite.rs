//! The ordered, immutable list of test cases for a run.

use serde::Serialize;
use serde_json::json;

use crate::error::DomainResult;
use crate::request::HttpMethod;
use crate::settings::Targets;
use crate::testing::TestCase;

/// Ordered sequence of test cases, built once and never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    /// Wraps an ordered list of cases.
    #[must_use]
    pub const fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// The default gateway route checks.
    ///
    /// # Errors
    ///
    /// Fails when the gateway base does not form valid URLs.
    pub fn gateway_default(targets: &Targets) -> DomainResult<Self> {
        let cases = vec![
            TestCase::new(
                "People - Get All",
                HttpMethod::Post,
                targets.gateway_url("/people/get-all"),
                [200, 202],
            )?
            .with_description("Gateway Route → Backend PeopleController.getAllPeople()"),
            TestCase::new(
                "People - Insert",
                HttpMethod::Post,
                targets.gateway_url("/people/insert"),
                [201, 400],
            )?
            .with_body(json!({
                "name": "TestCharacter",
                "description": "Test",
                "bonus": 10,
                "ability": "Test Ability"
            }))?
            .with_description("Gateway Route → Backend PeopleController.insertPeople()"),
            TestCase::new(
                "Weapons - Get All",
                HttpMethod::Get,
                targets.gateway_url("/weapons"),
                [200],
            )?
            .with_description("Gateway Route → Backend WeaponController.getAllWeapons()"),
            // Unauthenticated: the gateway must reject these.
            TestCase::new(
                "Gallery - Get All",
                HttpMethod::Post,
                targets.gateway_url("/gallery/getAll"),
                [401],
            )?
            .with_description("Gateway Route → Backend GalleryController.getAllImages()"),
            TestCase::new(
                "Blackjack - Status",
                HttpMethod::Get,
                targets.gateway_url("/deckofcards/blackjack/status"),
                [401],
            )?
            .with_description("Gateway Route → Backend BlackjackController.getStatus()"),
            TestCase::new(
                "People - Damage Calculation",
                HttpMethod::Get,
                targets.gateway_url("/people/damageWithWeapon?name=TestCharacter"),
                [200, 400],
            )?
            .with_description(
                "Gateway Route → Backend WeaponDamageController.calculateDamageWithWeapon()",
            ),
            TestCase::new(
                "People - Get Names",
                HttpMethod::Get,
                targets.gateway_url("/people/names"),
                [200],
            )?
            .with_description("Gateway Route → Backend PeopleController.getNames()"),
            TestCase::new(
                "Health Consumer Check",
                HttpMethod::Get,
                targets.gateway_url("/health/consumer"),
                [200, 500],
            )?
            .with_description("Gateway Route → Backend HealthConsumerController"),
        ];
        Ok(Self::new(cases))
    }

    /// Keeps only the cases whose name starts with `prefix`, preserving order.
    #[must_use]
    pub fn filter_by_prefix(&self, prefix: &str) -> Self {
        Self::new(
            self.cases
                .iter()
                .filter(|case| case.name().starts_with(prefix))
                .cloned()
                .collect(),
        )
    }

    /// Iterates cases in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True when there is nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// The cases as a slice.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }
}

impl<'a> IntoIterator for &'a TestSuite {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
