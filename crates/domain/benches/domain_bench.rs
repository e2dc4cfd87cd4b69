use common::{EntityId, VendorType};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{CreateVendor, VendorDetails, VendorService, validation::normalize_profile};
use vendor_store::InMemoryVendorStore;

fn details(code: &str) -> VendorDetails {
    VendorDetails {
        vendor_code: code.to_string(),
        vendor_name: "Benchmark Supplies".to_string(),
        vendor_type: "supplier".to_string(),
        country: "us".to_string(),
        payment_terms: "NET30".to_string(),
        payment_method: Some("ach".to_string()),
        currency: "usd".to_string(),
        credit_limit: Some(1_000_000),
        tags: vec!["bench".to_string()],
        ..Default::default()
    }
}

fn bench_normalize_profile(c: &mut Criterion) {
    c.bench_function("domain/normalize_profile", |b| {
        b.iter(|| normalize_profile(details("bench-001"), VendorType::Supplier).unwrap());
    });
}

fn bench_create_vendor(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/create_vendor", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = VendorService::new(InMemoryVendorStore::new());
                let cmd = CreateVendor {
                    entity_id: EntityId::new(),
                    details: details("bench-001"),
                    created_by: None,
                };
                service.create_vendor(cmd).await.unwrap();
            });
        });
    });
}

fn bench_validate_vendor(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = VendorService::new(InMemoryVendorStore::new());
    let entity_id = EntityId::new();
    let vendor = rt.block_on(async {
        let vendor = service
            .create_vendor(CreateVendor {
                entity_id,
                details: details("bench-001"),
                created_by: None,
            })
            .await
            .unwrap();
        service
            .activate_vendor(vendor.id, entity_id, None)
            .await
            .unwrap()
    });

    c.bench_function("domain/validate_vendor", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .validate_vendor(vendor.id, entity_id)
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_list_vendors(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = VendorService::new(InMemoryVendorStore::new());
    let entity_id = EntityId::new();
    rt.block_on(async {
        for i in 0..500 {
            service
                .create_vendor(CreateVendor {
                    entity_id,
                    details: details(&format!("bench-{i:04}")),
                    created_by: None,
                })
                .await
                .unwrap();
        }
    });

    c.bench_function("domain/list_vendors_500", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .list_vendors(domain::ListVendors::for_entity(entity_id))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_normalize_profile,
    bench_create_vendor,
    bench_validate_vendor,
    bench_list_vendors
);
criterion_main!(benches);
