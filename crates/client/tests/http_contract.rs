use dealdesk_core::config::ApiConfig;
use dealdesk_core::domain::catalog::{CategoryId, RegionId, ServiceId};
use dealdesk_core::domain::company::CompanyId;
use dealdesk_core::domain::deal::{DealId, DealType};
use dealdesk_core::payload::{CompanyPayload, CreateDealRequest, CustomerPayload};
use dealdesk_core::remote::{RemoteError, RemoteOps};
use dealdesk_client::HttpRemoteOps;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpRemoteOps {
    HttpRemoteOps::new(&ApiConfig {
        base_url: format!("{}/api/v1", server.uri()),
        token: "dd-test-token".to_string().into(),
        timeout_secs: 2,
    })
    .expect("http client")
}

#[tokio::test]
async fn company_search_sends_query_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/companies/search"))
        .and(query_param("query", "acme"))
        .and(query_param("page", "0"))
        .and(query_param("page_size", "2"))
        .and(bearer_token("dd-test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"company_id": "C-1", "name": "Acme Logistics", "contact": "9876543210", "tax_id": "GSTIN-1"},
            {"company_id": "C-2", "name": "Acme Traders", "contact": "9876543211", "tax_id": "GSTIN-2"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.search_companies("acme", 0, 2).await.expect("search page");

    assert_eq!(page.items.len(), 2);
    assert!(page.full_page, "a full page implies more results may exist");
}

#[tokio::test]
async fn short_page_reports_no_more_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"customer_id": "CU-7", "name": "Priya Nair", "contact": "9447000111", "email": "priya@example.in"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.search_customers("priya", 0, 10).await.expect("search page");

    assert_eq!(page.items.len(), 1);
    assert!(!page.full_page);
}

#[tokio::test]
async fn company_detail_decodes_nested_customers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/companies/C-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "company_id": "C-42",
            "name": "Acme Logistics Pvt Ltd",
            "tax_id": "GSTIN-22AAAAA",
            "contact": "9876543210",
            "email": "ops@acme.in",
            "region": "Kerala",
            "district": "Ernakulam",
            "language": "ml",
            "customers": [
                {"customer_id": "CU-7", "name": "Priya Nair", "contact": "9447000111", "email": "priya@example.in"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = client.company_detail(&CompanyId("C-42".to_string())).await.expect("record");

    assert_eq!(record.name, "Acme Logistics Pvt Ltd");
    assert_eq!(record.customers.len(), 1);
    assert_eq!(record.customers[0].name, "Priya Nair");
}

#[tokio::test]
async fn pricing_quote_posts_region_and_service_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/pricing/quote"))
        .and(body_partial_json(json!({
            "region_id": "KL",
            "service_ids": ["SVC-1", "SVC-2"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "service_id": "SVC-1",
                "professional_fee": "1500.00",
                "vendor_fee": "250.00",
                "contractor_fee": "0.00",
                "govt_fee": "100.00"
            },
            {
                "service_id": "SVC-2",
                "professional_fee": "900.00",
                "vendor_fee": "0.00",
                "contractor_fee": "0.00",
                "govt_fee": "50.00"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let quotes = client
        .quote_pricing(
            &RegionId("KL".to_string()),
            &[ServiceId("SVC-1".to_string()), ServiceId("SVC-2".to_string())],
        )
        .await
        .expect("quotes");

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].total(), rust_decimal::Decimal::new(185_000, 2));
}

#[tokio::test]
async fn server_error_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/regions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.list_regions().await.expect_err("status error");

    assert_eq!(
        error,
        RemoteError::Status { code: 503, message: "maintenance window".to_string() }
    );
}

#[tokio::test]
async fn slow_remote_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/service-categories/5/services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .list_services_by_category(&CategoryId("5".to_string()))
        .await
        .expect_err("timeout error");

    assert_eq!(error, RemoteError::Timeout);
}

#[tokio::test]
async fn rejected_submission_still_decodes_into_a_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/deals"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "message": "duplicate deal for this customer"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = CreateDealRequest {
        deal_type: DealType::Individual,
        associate_id: "ASSOC-9".to_string(),
        franchise_id: "FR-1".to_string(),
        company: CompanyPayload::Existing {
            is_existing: true,
            existing_company_id: CompanyId("C-42".to_string()),
        },
        customer: CustomerPayload::Existing {
            is_existing: true,
            existing_customer_id: dealdesk_core::domain::customer::CustomerId("CU-7".to_string()),
        },
        services: Vec::new(),
    };

    let receipt = client.create_deal(&request).await.expect("rejection is data, not an error");
    assert!(!receipt.success);
    assert_eq!(receipt.message.as_deref(), Some("duplicate deal for this customer"));
}

#[tokio::test]
async fn successful_creation_returns_the_new_deal_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/deals"))
        .and(body_partial_json(json!({"deal_type": "Individual", "associate_id": "ASSOC-9"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "deal_id": "D-1001"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = CreateDealRequest {
        deal_type: DealType::Individual,
        associate_id: "ASSOC-9".to_string(),
        franchise_id: "FR-1".to_string(),
        company: CompanyPayload::Existing {
            is_existing: true,
            existing_company_id: CompanyId("C-42".to_string()),
        },
        customer: CustomerPayload::Existing {
            is_existing: true,
            existing_customer_id: dealdesk_core::domain::customer::CustomerId("CU-7".to_string()),
        },
        services: Vec::new(),
    };

    let receipt = client.create_deal(&request).await.expect("receipt");
    assert!(receipt.success);
    assert_eq!(receipt.deal_id, Some(DealId("D-1001".to_string())));
}

#[tokio::test]
async fn deal_detail_seeds_edit_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/deals/D-100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deal_id": "D-100",
            "company_id": "C-42",
            "customer_id": "CU-7",
            "converted_at": "2026-01-15T10:30:00Z",
            "deal_type": "Individual",
            "company_name": "Acme Logistics",
            "company_tax_id": "GSTIN-22AAAAA",
            "company_contact": "9876543210",
            "company_email": "ops@acme.in",
            "company_region": "Kerala",
            "company_district": "Ernakulam",
            "company_language": "ml",
            "service_region": "KL",
            "category_id": "5",
            "service_ids": ["SVC-1"],
            "package_id": null,
            "billing_cadence": null,
            "customer_name": "Priya Nair",
            "customer_contact": "9447000111",
            "customer_email": "priya@example.in",
            "customer_region": "Kerala",
            "customer_district": "Ernakulam",
            "customer_language": "ml",
            "contact_consent": true,
            "closure_date": "2026-09-30"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = client.deal_detail(&DealId("D-100".to_string())).await.expect("record");

    assert_eq!(record.customer_name, "Priya Nair");
    assert_eq!(record.service_ids, vec![ServiceId("SVC-1".to_string())]);
    assert_eq!(record.deal_type, DealType::Individual);
}
