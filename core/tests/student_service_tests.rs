// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use students_core::application::gateways::{
    Liability, Payment, PaymentsGateway, Training, TrainingAccess, TrainingsGateway,
};
use students_core::application::student_service::{
    DeleteOutcome, StandardStudentService, StudentService,
};
use students_core::domain::student::{NewStudent, StudentId, StudentPatch, StudentStatus};
use students_core::infrastructure::repositories::InMemoryStudentRepository;

struct StubPaymentsGateway {
    liability: Liability,
    payments: Vec<Payment>,
}

impl StubPaymentsGateway {
    fn with_liability(liability: Liability) -> Self {
        Self {
            liability,
            payments: Vec::new(),
        }
    }
}

#[async_trait]
impl PaymentsGateway for StubPaymentsGateway {
    async fn has_payments(&self, _student_id: StudentId) -> Liability {
        self.liability
    }

    async fn payments_for(&self, _student_id: StudentId) -> Vec<Payment> {
        self.payments.clone()
    }

    async fn active_accesses(&self, _student_id: StudentId) -> Vec<TrainingAccess> {
        Vec::new()
    }
}

struct StubTrainingsGateway;

#[async_trait]
impl TrainingsGateway for StubTrainingsGateway {
    async fn training(&self, training_id: i64) -> Option<Training> {
        (training_id == 3).then(|| Training {
            id: 3,
            name: "Crossfit".to_string(),
            description: "HIIT".to_string(),
            price: 120.0,
            active: true,
        })
    }

    async fn active_trainings(&self) -> Vec<Training> {
        Vec::new()
    }
}

fn service_with(liability: Liability) -> (StandardStudentService, Arc<InMemoryStudentRepository>) {
    let repo = Arc::new(InMemoryStudentRepository::new());
    let service = StandardStudentService::new(
        repo.clone(),
        Arc::new(StubPaymentsGateway::with_liability(liability)),
        Arc::new(StubTrainingsGateway),
    );
    (service, repo)
}

fn service() -> (StandardStudentService, Arc<InMemoryStudentRepository>) {
    service_with(Liability::NotFound)
}

fn ana() -> NewStudent {
    NewStudent {
        name: "Ana Silva".to_string(),
        email: "ana@x.com".to_string(),
        phone: Some("11 99999-0000".to_string()),
        cpf: Some("12345678901".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        address: None,
        city: None,
        state: None,
        postal_code: None,
        notes: None,
    }
}

fn input(name: &str, email: &str, cpf: Option<&str>) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        email: email.to_string(),
        cpf: cpf.map(String::from),
        ..ana()
    }
}

#[tokio::test]
async fn created_student_is_retrievable_by_id() {
    let (svc, _) = service();

    let created = svc.create_student(ana()).await.unwrap().unwrap();
    assert_eq!(created.id, StudentId(1));
    assert_eq!(created.status, StudentStatus::Active);
    assert!(created.updated_at.is_none());
    // age is computed from the birth date at projection time
    assert!(created.age >= 35);

    let fetched = svc.get_student(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.email, created.email);
    assert_eq!(fetched.registered_at, created.registered_at);
}

#[tokio::test]
async fn duplicate_email_is_refused_without_persisting() {
    let (svc, _) = service();

    svc.create_student(ana()).await.unwrap().unwrap();
    let second = svc
        .create_student(input("Outra Pessoa", "ana@x.com", None))
        .await
        .unwrap();

    assert!(second.is_none());
    assert_eq!(svc.student_count().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_email_differing_in_case_is_refused() {
    let (svc, _) = service();

    svc.create_student(ana()).await.unwrap().unwrap();
    let second = svc
        .create_student(input("Outra Pessoa", "ANA@X.COM", None))
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn duplicate_cpf_is_refused() {
    let (svc, _) = service();

    svc.create_student(ana()).await.unwrap().unwrap();
    let second = svc
        .create_student(input("Bruno Costa", "bruno@x.com", Some("12345678901")))
        .await
        .unwrap();
    assert!(second.is_none());
    assert_eq!(svc.student_count().await.unwrap(), 1);
}

#[tokio::test]
async fn empty_patch_changes_nothing_but_updated_at() {
    let (svc, _) = service();
    let created = svc.create_student(ana()).await.unwrap().unwrap();

    let updated = svc
        .update_student(created.id, StudentPatch::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, created.name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.phone, created.phone);
    assert_eq!(updated.cpf, created.cpf);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.registered_at, created.registered_at);
    // a no-op update still counts as a mutation
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn phone_only_patch_preserves_other_fields() {
    let (svc, _) = service();
    let created = svc.create_student(ana()).await.unwrap().unwrap();

    let patch: StudentPatch = serde_json::from_str(r#"{"phone": "11 1234-5678"}"#).unwrap();
    let updated = svc.update_student(created.id, patch).await.unwrap().unwrap();

    assert_eq!(updated.phone.as_deref(), Some("11 1234-5678"));
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.status, created.status);
}

#[tokio::test]
async fn explicit_null_clears_an_optional_field() {
    let (svc, _) = service();
    let created = svc.create_student(ana()).await.unwrap().unwrap();
    assert!(created.phone.is_some());

    let patch: StudentPatch = serde_json::from_str(r#"{"phone": null}"#).unwrap();
    let updated = svc.update_student(created.id, patch).await.unwrap().unwrap();
    assert!(updated.phone.is_none());
}

#[tokio::test]
async fn update_of_unknown_id_is_absent() {
    let (svc, _) = service();
    let result = svc
        .update_student(StudentId(42), StudentPatch::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn update_refuses_email_claimed_by_another_student() {
    let (svc, _) = service();
    svc.create_student(ana()).await.unwrap().unwrap();
    let bruno = svc
        .create_student(input("Bruno Costa", "bruno@x.com", None))
        .await
        .unwrap()
        .unwrap();

    let patch: StudentPatch = serde_json::from_str(r#"{"email": "ana@x.com"}"#).unwrap();
    assert!(svc.update_student(bruno.id, patch).await.unwrap().is_none());

    // re-submitting one's own email is not a conflict
    let patch: StudentPatch = serde_json::from_str(r#"{"email": "bruno@x.com"}"#).unwrap();
    assert!(svc.update_student(bruno.id, patch).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_is_blocked_by_payment_liability() {
    let (svc, _) = service_with(Liability::Found);
    let created = svc.create_student(ana()).await.unwrap().unwrap();

    assert_eq!(
        svc.delete_student(created.id).await.unwrap(),
        DeleteOutcome::Blocked
    );
    // no removal happened
    assert!(svc.student_exists(created.id).await.unwrap());
}

#[tokio::test]
async fn delete_fails_open_when_liability_is_unknown() {
    let (svc, _) = service_with(Liability::Unknown);
    let created = svc.create_student(ana()).await.unwrap().unwrap();

    assert_eq!(
        svc.delete_student(created.id).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(!svc.student_exists(created.id).await.unwrap());
}

#[tokio::test]
async fn delete_of_unknown_id_reports_not_found() {
    let (svc, _) = service();
    assert_eq!(
        svc.delete_student(StudentId(42)).await.unwrap(),
        DeleteOutcome::NotFound
    );
}

#[tokio::test]
async fn search_matches_substrings_ordered_by_name() {
    let (svc, _) = service();
    svc.create_student(input("João Souza", "js@x.com", None))
        .await
        .unwrap()
        .unwrap();
    svc.create_student(input("Maria Lima", "maria.jo@y.com", None))
        .await
        .unwrap()
        .unwrap();
    svc.create_student(input("Pedro Alves", "pedro@y.com", None))
        .await
        .unwrap()
        .unwrap();

    let hits = svc.search_students("jo").await.unwrap();
    let names: Vec<_> = hits.into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["João Souza", "Maria Lima"]);
}

#[tokio::test]
async fn status_filter_returns_only_matching_records() {
    let (svc, _) = service();
    svc.create_student(ana()).await.unwrap().unwrap();
    let bruno = svc
        .create_student(input("Bruno Costa", "bruno@x.com", None))
        .await
        .unwrap()
        .unwrap();

    let patch: StudentPatch = serde_json::from_str(r#"{"status": "suspended"}"#).unwrap();
    svc.update_student(bruno.id, patch).await.unwrap().unwrap();

    let suspended = svc
        .students_by_status(StudentStatus::Suspended)
        .await
        .unwrap();
    assert_eq!(suspended.len(), 1);
    assert_eq!(suspended[0].name, "Bruno Costa");

    let active = svc.students_by_status(StudentStatus::Active).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Ana Silva");
}

#[tokio::test]
async fn uniqueness_validators_respect_exclusion() {
    let (svc, _) = service();
    let created = svc.create_student(ana()).await.unwrap().unwrap();

    assert!(!svc.validate_email_unique("ana@x.com", None).await.unwrap());
    assert!(svc
        .validate_email_unique("ana@x.com", Some(created.id))
        .await
        .unwrap());
    assert!(svc.validate_email_unique("livre@x.com", None).await.unwrap());

    assert!(!svc.validate_cpf_unique("12345678901", None).await.unwrap());
    assert!(svc
        .validate_cpf_unique("12345678901", Some(created.id))
        .await
        .unwrap());
}

#[tokio::test]
async fn lookups_by_email_and_cpf_project_the_record() {
    let (svc, _) = service();
    svc.create_student(ana()).await.unwrap().unwrap();

    let by_email = svc.get_student_by_email("ANA@x.com").await.unwrap().unwrap();
    assert_eq!(by_email.name, "Ana Silva");

    let by_cpf = svc.get_student_by_cpf("12345678901").await.unwrap().unwrap();
    assert_eq!(by_cpf.email, "ana@x.com");

    assert!(svc.get_student_by_cpf("00000000000").await.unwrap().is_none());
}

#[tokio::test]
async fn student_payments_composite_gathers_gateway_data() {
    let repo = Arc::new(InMemoryStudentRepository::new());
    let payments = vec![Payment {
        id: 10,
        training_id: 3,
        amount: 99.9,
        due_date: chrono::Utc::now(),
        status: "paid".to_string(),
        payment_method: "pix".to_string(),
        training_name: "Crossfit".to_string(),
        created_at: chrono::Utc::now(),
    }];
    let svc = StandardStudentService::new(
        repo,
        Arc::new(StubPaymentsGateway {
            liability: Liability::Found,
            payments,
        }),
        Arc::new(StubTrainingsGateway),
    );

    let created = svc.create_student(ana()).await.unwrap().unwrap();
    let composite = svc.student_payments(created.id).await.unwrap().unwrap();
    assert_eq!(composite.name, "Ana Silva");
    assert_eq!(composite.payments.len(), 1);
    assert!(composite.active_accesses.is_empty());

    assert!(svc.student_payments(StudentId(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn training_proxies_pass_through() {
    let (svc, _) = service();
    assert_eq!(svc.training(3).await.unwrap().unwrap().name, "Crossfit");
    assert!(svc.training(4).await.unwrap().is_none());
    assert!(svc.active_trainings().await.unwrap().is_empty());
}
