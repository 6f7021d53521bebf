//! In-memory stand-in for the complaint backend, served over real HTTP
//! so requests go through the `reqwest` client unchanged.
#![allow(dead_code)]

use actix_multipart::Multipart;
use actix_web::dev::Service as _;
use actix_web::{guard, web, App, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Mutex;

pub const PASSWORD: &str = "rahasia123";
pub const CITIZEN_TOKEN: &str = "token-citizen";

/// A file part received in a multipart body.
#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Default)]
pub struct State {
    pub complaints: Vec<Value>,
    pub categories: Vec<Value>,
    pub staff: Vec<Value>,
    pub citizens: Vec<Value>,
    pub announcements: Vec<Value>,
    /// File parts of every multipart request, in arrival order
    pub uploads: Vec<Upload>,
    pub next_id: i64,
    /// Category deletes answer 409 while set
    pub fail_category_delete: bool,
    /// Attachment uploads answer 413 while set
    pub fail_upload: bool,
    /// `METHOD /path` of every request, in arrival order
    pub hits: Vec<String>,
}

#[derive(Default)]
pub struct MockBackend {
    pub state: Mutex<State>,
}

impl MockBackend {
    /// Backend with the given categories, three staff accounts
    /// (`admin`, `pimpinan`, `master`) and five citizens.
    pub fn new(names: &[(i64, &str)]) -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            state.next_id = 40;
            state.categories = names
                .iter()
                .map(|(id, nama)| json!({ "id": id, "nama": nama }))
                .collect();
            state.staff = STAFF
                .iter()
                .map(|(id, username, role)| staff_record(*id, username, role))
                .collect();
            state.citizens = CITIZENS
                .iter()
                .enumerate()
                .map(|(i, nama)| {
                    json!({
                        "id": 100 + i as i64,
                        "nama_lengkap": nama,
                        "nik": format!("35071234567800{:02}", i),
                        "role": "masyarakat"
                    })
                })
                .collect();
        }
        backend
    }

    pub fn hits(&self) -> Vec<String> {
        self.state.lock().unwrap().hits.clone()
    }

    pub fn complaint_status(&self, id: i64) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .complaints
            .iter()
            .find(|c| c["id"] == id)
            .and_then(|c| c["status"].as_str().map(str::to_string))
    }
}

const STAFF: [(i64, &str, &str); 3] = [
    (1, "admin", "admin"),
    (2, "pimpinan", "pimpinan"),
    (3, "master", "master_admin"),
];

const CITIZENS: [&str; 5] = [
    "Siti Aminah",
    "Budi Santoso",
    "Dewi Lestari",
    "Agus Salim",
    "Rina Wati",
];

fn staff_record(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "nama_lengkap": format!("Petugas {}", username),
        "username": username,
        "role": role
    })
}

/// Serve a fresh mock; the returned handle shares its state.
pub fn start(backend: MockBackend) -> (actix_test::TestServer, web::Data<MockBackend>) {
    let data = web::Data::new(backend);
    let app_data = data.clone();

    let server = actix_test::start(move || {
        let hits = app_data.clone();
        App::new()
            .app_data(app_data.clone())
            .wrap_fn(move |req, srv| {
                hits.state
                    .lock()
                    .unwrap()
                    .hits
                    .push(format!("{} {}", req.method(), req.path()));
                srv.call(req)
            })
            .route("/api/auth/login", web::post().to(citizen_login))
            .route("/api/admin/login", web::post().to(staff_login))
            .route("/api/kategori", web::get().to(list_categories))
            .route("/api/admin/kategori/{id}", web::delete().to(delete_category))
            .service(
                web::resource("/api/pengaduan")
                    .route(
                        web::post()
                            .guard(guard::Header("content-type", "application/json"))
                            .to(create_complaint),
                    )
                    .route(web::post().to(create_complaint_multipart)),
            )
            .route("/api/pengaduan/saya", web::get().to(my_complaints))
            .route("/api/pengaduan/saya/{id}", web::get().to(my_complaint))
            .route("/api/pengaduan/{id}/lampiran", web::post().to(upload_attachment))
            .route("/api/admin/pengaduan/{id}", web::get().to(staff_complaint))
            .route("/api/admin/pengaduan/{id}/verifikasi", web::put().to(verify))
            .route("/api/admin/pengaduan/{id}/persetujuan", web::put().to(approve))
            .route("/api/admin/pengaduan/{id}/selesai", web::put().to(complete))
            .route("/api/dashboard/statistik-laporan", web::get().to(report_statistics))
            .route("/api/master/dashboard/statistik-sistem", web::get().to(system_statistics))
            .service(
                web::resource("/api/admin/admins")
                    .route(web::get().to(list_staff))
                    .route(web::post().to(create_staff)),
            )
            .route("/api/admin/admins/{id}", web::delete().to(delete_staff))
            .route("/api/admin/users", web::get().to(list_citizens))
            .route("/api/admin/users/{id}", web::delete().to(delete_citizen))
            .service(
                web::resource("/api/pengumuman")
                    .route(web::get().to(list_announcements))
                    .route(web::post().to(create_announcement)),
            )
            .route("/api/pengumuman/{id}", web::delete().to(delete_announcement))
    });

    (server, data)
}

pub fn staff_token(role: &str) -> String {
    format!("token-{}", role)
}

fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn staff_role(req: &HttpRequest) -> Option<String> {
    bearer(req)
        .filter(|t| t != CITIZEN_TOKEN)
        .and_then(|t| t.strip_prefix("token-").map(str::to_string))
}

fn fail(status: actix_web::http::StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "success": false, "message": message }))
}

fn ok(data: Value) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data }))
}

fn bad_request(message: &str) -> HttpResponse {
    fail(actix_web::http::StatusCode::BAD_REQUEST, message)
}

fn forbidden() -> HttpResponse {
    fail(actix_web::http::StatusCode::FORBIDDEN, "Akses ditolak")
}

/// Master admin token or the matching error response.
fn require_master(req: &HttpRequest) -> Result<(), HttpResponse> {
    match staff_role(req).as_deref() {
        Some("master_admin") => Ok(()),
        Some(_) => Err(forbidden()),
        None => Err(unauthorized()),
    }
}

fn unauthorized() -> HttpResponse {
    fail(
        actix_web::http::StatusCode::UNAUTHORIZED,
        "Token tidak valid, silakan login kembali",
    )
}

async fn citizen_login(body: web::Json<Value>) -> HttpResponse {
    if body["password"] != PASSWORD {
        return fail(
            actix_web::http::StatusCode::UNAUTHORIZED,
            "Username atau password salah",
        );
    }
    ok(json!({
        "token": CITIZEN_TOKEN,
        "user": {
            "id": 7,
            "nama_lengkap": "Siti Aminah",
            "username": body["username"],
            "nik": "3507123456780001",
            "role": "masyarakat"
        }
    }))
}

async fn staff_login(body: web::Json<Value>) -> HttpResponse {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let (id, role) = match username.as_str() {
        "admin" => (1, "admin"),
        "pimpinan" => (2, "pimpinan"),
        "master" => (3, "master_admin"),
        _ => return fail(actix_web::http::StatusCode::UNAUTHORIZED, "Akun tidak ditemukan"),
    };
    if body["password"] != PASSWORD {
        return fail(actix_web::http::StatusCode::UNAUTHORIZED, "Password salah");
    }
    // Staff login puts the token beside `data`.
    HttpResponse::Ok().json(json!({
        "success": true,
        "token": staff_token(role),
        "data": staff_record(id, &username, role)
    }))
}

async fn list_categories(state: web::Data<MockBackend>) -> HttpResponse {
    let state = state.state.lock().unwrap();
    ok(json!({ "kategori": state.categories }))
}

async fn delete_category(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if staff_role(&req).is_none() {
        return unauthorized();
    }
    let id = path.into_inner();
    let mut state = state.state.lock().unwrap();
    if state.fail_category_delete {
        return fail(
            actix_web::http::StatusCode::CONFLICT,
            "Kategori masih digunakan oleh pengaduan",
        );
    }
    state.categories.retain(|c| c["id"] != id);
    HttpResponse::Ok().json(json!({ "success": true, "message": "Kategori dihapus" }))
}

/// Record a new pending complaint from its submitted fields.
fn store_complaint(state: &mut State, body: &Value, lampiran: Vec<Value>) -> HttpResponse {
    state.next_id += 1;
    let id = state.next_id;
    let nama = state
        .categories
        .iter()
        .find(|c| c["id"] == body["kategori_id"])
        .map(|c| c["nama"].clone())
        .unwrap_or(Value::Null);

    let complaint = json!({
        "id": id,
        "judul": body["judul"],
        "deskripsi": body["isi_laporan"],
        "lokasi": body["lokasi"],
        "status": "pending",
        "createdAt": "2025-06-01T08:00:00.000Z",
        "kategori": { "id": body["kategori_id"], "nama": nama },
        "lampiran": lampiran
    });
    state.complaints.push(complaint.clone());
    HttpResponse::Created().json(json!({
        "success": true,
        "message": "Pengaduan berhasil dikirim",
        "data": { "pengaduan": complaint }
    }))
}

async fn create_complaint(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    if bearer(&req).as_deref() != Some(CITIZEN_TOKEN) {
        return unauthorized();
    }
    let mut state = state.state.lock().unwrap();
    store_complaint(&mut state, &body, Vec::new())
}

/// Text fields of a multipart body plus its file parts.
async fn read_multipart(
    mut payload: Multipart,
) -> Result<(Map<String, Value>, Vec<Upload>), HttpResponse> {
    let mut fields = Map::new();
    let mut files = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|_| bad_request("Form tidak valid"))?;
        let name = field.content_disposition().get_name().unwrap_or_default().to_string();
        let file_name = field.content_disposition().get_filename().map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|_| bad_request("Form tidak valid"))?;
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) => files.push(Upload {
                field: name,
                file_name,
                content_type,
                size: bytes.len(),
            }),
            None => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                fields.insert(name, Value::String(text));
            }
        }
    }
    Ok((fields, files))
}

async fn create_complaint_multipart(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    payload: Multipart,
) -> HttpResponse {
    if bearer(&req).as_deref() != Some(CITIZEN_TOKEN) {
        return unauthorized();
    }
    let (mut fields, files) = match read_multipart(payload).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    // Multipart sends every field as text.
    let kategori_id = fields
        .get("kategori_id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<i64>().ok());
    match kategori_id {
        Some(id) => fields.insert("kategori_id".to_string(), json!(id)),
        None => return bad_request("kategori_id wajib diisi"),
    };

    let lampiran: Vec<Value> = files
        .iter()
        .filter(|f| f.field == "gambar")
        .enumerate()
        .map(|(i, f)| {
            json!({ "id": i + 1, "filePath": format!("uploads\\{}", f.file_name) })
        })
        .collect();

    let mut state = state.state.lock().unwrap();
    state.uploads.extend(files);
    store_complaint(&mut state, &Value::Object(fields), lampiran)
}

async fn upload_attachment(
    state: web::Data<MockBackend>,
    path: web::Path<i64>,
    _body: web::Bytes,
) -> HttpResponse {
    let id = path.into_inner();
    let mut state = state.state.lock().unwrap();
    if state.fail_upload {
        return fail(
            actix_web::http::StatusCode::PAYLOAD_TOO_LARGE,
            "Gagal menyimpan lampiran",
        );
    }
    match state.complaints.iter_mut().find(|c| c["id"] == id) {
        Some(complaint) => {
            if let Some(list) = complaint["lampiran"].as_array_mut() {
                list.push(json!({ "id": 1, "filePath": "uploads\\bukti.jpg" }));
            }
            HttpResponse::Ok().json(json!({ "success": true }))
        }
        None => fail(actix_web::http::StatusCode::NOT_FOUND, "Pengaduan tidak ditemukan"),
    }
}

async fn my_complaints(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    if bearer(&req).as_deref() != Some(CITIZEN_TOKEN) {
        return unauthorized();
    }
    let state = state.state.lock().unwrap();
    ok(json!({ "pengaduan": state.complaints }))
}

fn find_complaint(state: &web::Data<MockBackend>, id: i64) -> HttpResponse {
    let state = state.state.lock().unwrap();
    match state.complaints.iter().find(|c| c["id"] == id) {
        Some(complaint) => ok(complaint.clone()),
        None => fail(actix_web::http::StatusCode::NOT_FOUND, "Pengaduan tidak ditemukan"),
    }
}

async fn my_complaint(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if bearer(&req).as_deref() != Some(CITIZEN_TOKEN) {
        return unauthorized();
    }
    find_complaint(&state, path.into_inner())
}

async fn staff_complaint(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if staff_role(&req).is_none() {
        return unauthorized();
    }
    find_complaint(&state, path.into_inner())
}

/// Apply a transition the way the real backend guards it.
fn transition(
    state: &web::Data<MockBackend>,
    req: &HttpRequest,
    id: i64,
    roles: &[&str],
    from: &[&str],
    to: &str,
) -> HttpResponse {
    let role = match staff_role(req) {
        Some(role) => role,
        None => return unauthorized(),
    };
    if !roles.contains(&role.as_str()) {
        return forbidden();
    }

    let mut state = state.state.lock().unwrap();
    let complaint = match state.complaints.iter_mut().find(|c| c["id"] == id) {
        Some(complaint) => complaint,
        None => return fail(actix_web::http::StatusCode::NOT_FOUND, "Pengaduan tidak ditemukan"),
    };
    let current = complaint["status"].as_str().unwrap_or_default().to_string();
    if !from.contains(&current.as_str()) {
        return fail(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Status pengaduan tidak sesuai",
        );
    }
    complaint["status"] = json!(to);
    HttpResponse::Ok().json(json!({ "success": true, "message": "Status diperbarui" }))
}

async fn verify(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> HttpResponse {
    let to = match body["status"].as_str() {
        Some(s) if s == "diterima" || s == "ditolak" => s.to_string(),
        _ => return fail(actix_web::http::StatusCode::BAD_REQUEST, "Status tidak valid"),
    };
    transition(
        &state,
        &req,
        path.into_inner(),
        &["admin", "master_admin"],
        &["pending"],
        &to,
    )
}

async fn approve(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    transition(
        &state,
        &req,
        path.into_inner(),
        &["pimpinan"],
        &["diterima", "diproses"],
        "dilaksanakan",
    )
}

async fn complete(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    transition(
        &state,
        &req,
        path.into_inner(),
        &["admin", "master_admin"],
        &["dilaksanakan"],
        "selesai",
    )
}

async fn report_statistics(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    if staff_role(&req).is_none() {
        return unauthorized();
    }
    let state = state.state.lock().unwrap();
    let count = |status: &str| state.complaints.iter().filter(|c| c["status"] == status).count();
    ok(json!({
        "total": state.complaints.len(),
        "pending": count("pending"),
        "proses": count("diterima") + count("diproses") + count("dilaksanakan"),
        "selesai": count("selesai"),
        "ditolak": count("ditolak")
    }))
}

async fn system_statistics(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    match staff_role(&req).as_deref() {
        Some("master_admin") => {}
        Some(_) => return forbidden(),
        None => return unauthorized(),
    }
    let state = state.state.lock().unwrap();
    ok(json!({
        "total_users": 12,
        "total_pengaduan": state.complaints.len(),
        "active_admins": 3
    }))
}

async fn list_staff(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    if let Err(response) = require_master(&req) {
        return response;
    }
    let state = state.state.lock().unwrap();
    ok(json!({ "admins": state.staff }))
}

async fn create_staff(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(response) = require_master(&req) {
        return response;
    }
    let mut state = state.state.lock().unwrap();
    if state.staff.iter().any(|a| a["username"] == body["username"]) {
        return bad_request("Username sudah digunakan");
    }
    if body["password"].as_str().map_or(true, str::is_empty) {
        return bad_request("Password wajib diisi");
    }
    state.next_id += 1;
    let account = json!({
        "id": state.next_id,
        "nama_lengkap": body["nama_lengkap"],
        "username": body["username"],
        "role": body["role"]
    });
    state.staff.push(account.clone());
    HttpResponse::Created().json(json!({ "success": true, "data": { "admin": account } }))
}

async fn delete_staff(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(response) = require_master(&req) {
        return response;
    }
    let id = path.into_inner();
    let mut state = state.state.lock().unwrap();
    state.staff.retain(|a| a["id"] != id);
    HttpResponse::Ok().json(json!({ "success": true, "message": "Admin dihapus" }))
}

#[derive(Deserialize)]
struct PageQuery {
    page: usize,
    limit: usize,
    #[serde(default)]
    search: String,
}

async fn list_citizens(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    if let Err(response) = require_master(&req) {
        return response;
    }
    let state = state.state.lock().unwrap();
    let term = query.search.to_lowercase();
    let matching: Vec<&Value> = state
        .citizens
        .iter()
        .filter(|c| {
            c["nama_lengkap"]
                .as_str()
                .map_or(false, |n| n.to_lowercase().contains(&term))
        })
        .collect();

    let limit = query.limit.max(1);
    let total_pages = ((matching.len() + limit - 1) / limit).max(1);
    let users: Vec<&Value> = matching
        .into_iter()
        .skip((query.page.max(1) - 1) * limit)
        .take(limit)
        .collect();
    ok(json!({ "users": users, "totalPages": total_pages }))
}

async fn delete_citizen(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(response) = require_master(&req) {
        return response;
    }
    let id = path.into_inner();
    let mut state = state.state.lock().unwrap();
    let before = state.citizens.len();
    state.citizens.retain(|c| c["id"] != id);
    if state.citizens.len() == before {
        return fail(actix_web::http::StatusCode::NOT_FOUND, "Pengguna tidak ditemukan");
    }
    HttpResponse::Ok().json(json!({ "success": true, "message": "Pengguna dihapus" }))
}

async fn list_announcements(state: web::Data<MockBackend>) -> HttpResponse {
    let state = state.state.lock().unwrap();
    ok(json!({ "pengumuman": state.announcements }))
}

async fn create_announcement(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    payload: Multipart,
) -> HttpResponse {
    if staff_role(&req).is_none() {
        return unauthorized();
    }
    let (fields, files) = match read_multipart(payload).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };
    let gambar = files
        .iter()
        .find(|f| f.field == "gambar")
        .map(|f| format!("uploads/{}", f.file_name));

    let mut state = state.state.lock().unwrap();
    state.next_id += 1;
    let announcement = json!({
        "id": state.next_id,
        "judul": fields.get("judul"),
        "isi": fields.get("isi"),
        "gambar": gambar,
        "createdAt": "2025-06-10T09:00:00Z"
    });
    state.announcements.push(announcement.clone());
    state.uploads.extend(files);
    HttpResponse::Created().json(json!({
        "success": true,
        "data": { "pengumuman": announcement }
    }))
}

async fn delete_announcement(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if staff_role(&req).is_none() {
        return unauthorized();
    }
    let id = path.into_inner();
    let mut state = state.state.lock().unwrap();
    state.announcements.retain(|a| a["id"] != id);
    HttpResponse::Ok().json(json!({ "success": true }))
}
