//! Shared fixtures: an in-memory backend with the same rules as the real one,
//! and a canned-response HTTP server for exercising the reqwest client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use restavo::api::*;
use restavo::config::UiConfig;
use restavo::{App, ClientError};

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    session: Option<i64>,
    hotels: Vec<Hotel>,
    bookings: Vec<(i64, Booking)>,
    next_booking_id: i64,
    favorites: Vec<(i64, Favorite)>,
    offline: bool,
}

/// Backend double. Every trait call is counted by endpoint path.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<State>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

fn unauthorized() -> ClientError {
    ClientError::Rejected {
        status: 401,
        message: "Sorry, you need to sign in.".to_string(),
    }
}

fn offline(path: &str) -> ClientError {
    ClientError::Transport {
        url: format!("http://mock{path}"),
        detail: "connection refused".to_string(),
    }
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        {
            let mut s = api.state.lock().unwrap();
            s.next_booking_id = 1;
            let seed = [
                ("Grand Hotel Dubai", "Dubai", 250.0, 4.8),
                ("Dubai Marina View", "Dubai", 300.0, 4.9),
                ("Palm Resort", "Dubai", 450.0, 5.0),
                ("Cairo Nile View", "Cairo", 120.0, 4.5),
                ("Pyramids Plaza", "Cairo", 150.0, 4.6),
            ];
            s.hotels = seed
                .iter()
                .enumerate()
                .map(|(i, (name, city, price, rating))| Hotel {
                    id: i as i64 + 1,
                    name: name.to_string(),
                    city: city.to_string(),
                    price: *price,
                    rating: *rating,
                    image_url: Some(format!("./static/image/Hotel{}.jpg", i + 1)),
                })
                .collect();
        }
        api
    }

    /// Add an account and return its id.
    pub fn add_user(&self, username: &str, password: &str, full_name: Option<&str>, phone: Option<&str>) -> i64 {
        let mut s = self.state.lock().unwrap();
        let id = s.accounts.len() as i64 + 1;
        s.accounts.push(Account {
            user: User {
                id,
                username: username.to_string(),
                full_name: full_name.map(str::to_string),
                phone: phone.map(str::to_string),
            },
            password: password.to_string(),
        });
        id
    }

    pub fn add_favorite(&self, user_id: i64, name: &str, city: &str) {
        self.state.lock().unwrap().favorites.push((
            user_id,
            Favorite {
                item_name: name.to_string(),
                city: city.to_string(),
            },
        ));
    }

    /// Pretend a session cookie from an earlier visit is still valid.
    pub fn resume_session(&self, user_id: i64) {
        self.state.lock().unwrap().session = Some(user_id);
    }

    /// Drop the server-side session, as if the cookie expired.
    pub fn expire_session(&self) {
        self.state.lock().unwrap().session = None;
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn calls(&self, path: &'static str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn stored_bookings(&self) -> Vec<Booking> {
        self.state.lock().unwrap().bookings.iter().map(|(_, b)| b.clone()).collect()
    }

    pub fn stored_favorites(&self, user_id: i64) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .favorites
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, f)| f.item_name.clone())
            .collect()
    }

    fn hit(&self, path: &'static str) -> Result<(), ClientError> {
        *self.calls.lock().unwrap().entry(path).or_insert(0) += 1;
        if self.state.lock().unwrap().offline {
            return Err(offline(path));
        }
        Ok(())
    }

    fn session_user(&self) -> Result<i64, ClientError> {
        self.state.lock().unwrap().session.ok_or_else(unauthorized)
    }
}

#[async_trait]
impl HotelApi for MockApi {
    async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.hit(STATUS)?;
        let s = self.state.lock().unwrap();
        let user = s
            .session
            .and_then(|id| s.accounts.iter().find(|a| a.user.id == id))
            .map(|a| a.user.clone());
        Ok(StatusResponse {
            is_authenticated: user.is_some(),
            user,
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        self.hit(LOGIN)?;
        let mut s = self.state.lock().unwrap();
        let found = s
            .accounts
            .iter()
            .find(|a| a.user.username == credentials.username && a.password == credentials.password)
            .map(|a| a.user.clone());
        match found {
            Some(user) => {
                s.session = Some(user.id);
                Ok(LoginResponse {
                    message: "Signed in".to_string(),
                    user,
                })
            }
            None => Err(ClientError::Rejected {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        }
    }

    async fn register(&self, credentials: &Credentials) -> Result<MessageResponse, ClientError> {
        self.hit(REGISTER)?;
        let age: i64 = credentials
            .age
            .as_deref()
            .and_then(|a| a.parse().ok())
            .unwrap_or(0);
        if age < 18 {
            return Err(ClientError::Rejected {
                status: 400,
                message: "You must be 18 or older".to_string(),
            });
        }
        let exists = self
            .state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .any(|a| a.user.username == credentials.username);
        if exists {
            return Err(ClientError::Rejected {
                status: 400,
                message: "User already exists".to_string(),
            });
        }
        self.add_user(&credentials.username, &credentials.password, None, None);
        Ok(MessageResponse {
            message: "Registered".to_string(),
        })
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.hit(LOGOUT)?;
        self.session_user()?;
        self.state.lock().unwrap().session = None;
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<MessageResponse, ClientError> {
        self.hit(PROFILE_UPDATE)?;
        let id = self.session_user()?;
        let mut s = self.state.lock().unwrap();
        if s.accounts.iter().any(|a| a.user.username == update.username && a.user.id != id) {
            return Err(ClientError::Rejected {
                status: 400,
                message: "Email already in use".to_string(),
            });
        }
        if let Some(acc) = s.accounts.iter_mut().find(|a| a.user.id == id) {
            acc.user.username = update.username.clone();
            acc.user.full_name = Some(update.full_name.clone());
            acc.user.phone = Some(update.phone.clone());
            if let Some(pw) = &update.new_password {
                acc.password = pw.clone();
            }
        }
        Ok(MessageResponse {
            message: "Profile updated".to_string(),
        })
    }

    async fn search(&self, city: &str) -> Result<Vec<Hotel>, ClientError> {
        self.hit(SEARCH)?;
        let s = self.state.lock().unwrap();
        Ok(s.hotels
            .iter()
            .filter(|h| h.city.eq_ignore_ascii_case(city))
            .cloned()
            .collect())
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingCreated, ClientError> {
        self.hit(BOOKING)?;
        let user = self.session_user()?;
        if request.booking_name.is_empty() {
            return Err(ClientError::Rejected {
                status: 400,
                message: "Booking name is required".to_string(),
            });
        }
        let mut s = self.state.lock().unwrap();
        let id = s.next_booking_id;
        s.next_booking_id += 1;
        let i = &request.intent;
        s.bookings.push((
            user,
            Booking {
                id,
                user_name: Some(request.booking_name.clone()),
                hotel_name: i.hotel_name.clone(),
                city: i.city.clone(),
                check_in: i.check_in.to_string(),
                check_out: i.check_out.to_string(),
                price: i.price,
                hotel_image_url: None,
            },
        ));
        Ok(BookingCreated {
            message: "Booked".to_string(),
            id: Some(id),
        })
    }

    async fn bookings(&self) -> Result<Vec<Booking>, ClientError> {
        self.hit(BOOKINGS)?;
        let user = self.session_user()?;
        let s = self.state.lock().unwrap();
        let mut list: Vec<Booking> = s
            .bookings
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, b)| b.clone())
            .collect();
        list.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(list)
    }

    async fn delete_booking(&self, id: i64) -> Result<MessageResponse, ClientError> {
        self.hit("/api/booking/{id}")?;
        let user = self.session_user()?;
        let mut s = self.state.lock().unwrap();
        let before = s.bookings.len();
        s.bookings.retain(|(u, b)| !(*u == user && b.id == id));
        if s.bookings.len() == before {
            return Err(ClientError::Rejected {
                status: 400,
                message: "Error".to_string(),
            });
        }
        Ok(MessageResponse {
            message: "Cancelled".to_string(),
        })
    }

    async fn favorites(&self) -> Result<Vec<Favorite>, ClientError> {
        self.hit(FAVORITES)?;
        let user = self.session_user()?;
        let s = self.state.lock().unwrap();
        Ok(s.favorites
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, f)| f.clone())
            .collect())
    }

    async fn toggle_favorite(&self, toggle: &FavoriteToggle) -> Result<ToggleResponse, ClientError> {
        self.hit(FAVORITES_TOGGLE)?;
        let user = self.session_user()?;
        let mut s = self.state.lock().unwrap();
        let present = s
            .favorites
            .iter()
            .any(|(u, f)| *u == user && f.item_name == toggle.item_name);
        if present {
            s.favorites
                .retain(|(u, f)| !(*u == user && f.item_name == toggle.item_name));
        } else {
            s.favorites.push((
                user,
                Favorite {
                    item_name: toggle.item_name.clone(),
                    city: toggle.city.clone(),
                },
            ));
        }
        Ok(ToggleResponse {
            success: true,
            is_favorite: Some(!present),
        })
    }

    async fn chat(&self, prompt: &str) -> Result<ChatResponse, ClientError> {
        self.hit(CHAT)?;
        Ok(ChatResponse {
            response: format!("You asked: {prompt}"),
        })
    }

    async fn analyze(&self, booking_id: i64) -> Result<Analysis, ClientError> {
        self.hit(ANALYZE)?;
        let user = self.session_user()?;
        let s = self.state.lock().unwrap();
        let booking = s
            .bookings
            .iter()
            .find(|(u, b)| *u == user && b.id == booking_id)
            .map(|(_, b)| b.clone())
            .ok_or(ClientError::Rejected {
                status: 404,
                message: "Not found".to_string(),
            })?;
        Ok(Analysis {
            title: booking.hotel_name.clone(),
            price_analysis: format!("{} is fair for {}", booking.price, booking.city),
            activity_suggestions: vec![ActivitySuggestion {
                name: "Old town walk".to_string(),
                reason: "Ten minutes away".to_string(),
            }],
            summary: "Good value".to_string(),
        })
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn app(api: MockApi) -> App<MockApi> {
    App::with_today(api, UiConfig::default(), today())
}

pub fn intent(hotel: &str, city: &str, price: f64) -> BookingIntent {
    BookingIntent {
        hotel_name: hotel.to_string(),
        city: city.to_string(),
        check_in: today(),
        check_out: NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
        price,
    }
}

// ---------------------------------------------------------------------------
// Canned HTTP server
// ---------------------------------------------------------------------------

/// A request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// A canned reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub extra_headers: Vec<(String, String)>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            extra_headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.push((name.to_string(), value.to_string()));
        self
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Start a server on an ephemeral port. `route` maps (method, path) to a
/// reply. Returns the base URL and the log of requests received.
pub async fn serve<F>(route: F) -> (String, Arc<Mutex<Vec<SeenRequest>>>)
where
    F: Fn(&str, &str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let route = Arc::new(route);

    let log = Arc::clone(&seen);
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let log = Arc::clone(&log);
            let route = Arc::clone(&route);
            tokio::spawn(async move {
                let Some(req) = read_request(&mut stream).await else {
                    return;
                };
                let reply = route(&req.method, &req.path);
                log.lock().unwrap().push(req);
                let mut head = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                    reply.status,
                    reason(reply.status),
                    reply.body.len()
                );
                for (k, v) in &reply.extra_headers {
                    head.push_str(&format!("{k}: {v}\r\n"));
                }
                head.push_str("\r\n");
                let _ = stream.write_all(head.as_bytes()).await;
                let _ = stream.write_all(reply.body.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), seen)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Option<SeenRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut parsed = httparse::Request::new(&mut headers);
        let header_len = match parsed.parse(&buf).ok()? {
            httparse::Status::Complete(len) => len,
            httparse::Status::Partial => continue,
        };

        let headers: HashMap<String, String> = parsed
            .headers
            .iter()
            .map(|h| {
                (
                    h.name.to_ascii_lowercase(),
                    String::from_utf8_lossy(h.value).to_string(),
                )
            })
            .collect();
        let content_length: usize = headers
            .get("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let method = parsed.method?.to_string();
        let path = parsed.path?.to_string();

        while buf.len() < header_len + content_length {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let end = (header_len + content_length).min(buf.len());
        let body = String::from_utf8_lossy(&buf[header_len..end]).to_string();
        return Some(SeenRequest {
            method,
            path,
            headers,
            body,
        });
    }
}
