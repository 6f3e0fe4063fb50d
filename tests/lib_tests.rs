use chrono::{NaiveDate, NaiveDateTime};
use fondos_api::entities::fondo;
use fondos_api::routes::fondos::{parse_fecha, FondoListResponse, Pagination};

fn fecha(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn test_parse_fecha_date_only() {
    assert_eq!(parse_fecha("2024-01-01"), Some(fecha(2024, 1, 1)));
}

#[test]
fn test_parse_fecha_with_time() {
    let expected = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(13, 45, 30)
        .unwrap();
    assert_eq!(parse_fecha("2024-06-15T13:45:30"), Some(expected));
    assert_eq!(parse_fecha("2024-06-15 13:45:30"), Some(expected));
}

#[test]
fn test_parse_fecha_rejects_garbage() {
    assert_eq!(parse_fecha(""), None);
    assert_eq!(parse_fecha("notadate"), None);
    assert_eq!(parse_fecha("01/01/2024"), None);
    assert_eq!(parse_fecha("2024-13-01"), None);
}

#[test]
fn test_pagination_serializes_total_pages_camel_case() {
    let pagination = Pagination {
        total: 25,
        page: 2,
        limit: 10,
        total_pages: 3,
    };
    let json = serde_json::to_value(&pagination).unwrap();
    assert_eq!(json["totalPages"], 3);
    assert!(json.get("total_pages").is_none());
}

#[test]
fn test_list_response_shape() {
    let model = fondo::Model {
        id: 1,
        nombre: "Fondo 1".to_string(),
        url: "http://example.com".to_string(),
        plataforma: "P1".to_string(),
        fechainicio: fecha(2024, 1, 1),
        fechacierre: fecha(2024, 12, 31),
        contador: 0,
    };
    let response = FondoListResponse {
        data: vec![model],
        pagination: Pagination {
            total: 1,
            page: 1,
            limit: 10,
            total_pages: 1,
        },
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["data"][0]["nombre"], "Fondo 1");
    assert_eq!(json["data"][0]["fechainicio"], "2024-01-01T00:00:00");
    assert_eq!(json["pagination"]["total"], 1);
}
