//! Sample requests written to an empty request collection.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Map;

use crate::domain::{PickupRequest, RequestId, Status, WasteTypes};

struct Sample {
    id: &'static str,
    user_id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    address: &'static str,
    date: (u32, u32),
    waste_types: &'static [&'static str],
    created: (u32, u32),
}

const SAMPLES: [Sample; 4] = [
    Sample {
        id: "req-001",
        user_id: "test-user",
        name: "Rajesh Kumar",
        email: "rajesh@gmail.com",
        phone: "+91 98765 43210",
        address: "BTM Layout, 2nd Stage, Bangalore, Karnataka 560076",
        date: (1, 20),
        waste_types: &["Plastic Bottles", "Paper/Cardboard", "Metal Cans"],
        created: (1, 18),
    },
    Sample {
        id: "req-002",
        user_id: "test-user-2",
        name: "Priya Sharma",
        email: "priya@gmail.com",
        phone: "+91 87654 32109",
        address: "Koramangala, 5th Block, Bangalore, Karnataka 560095",
        date: (1, 21),
        waste_types: &["E-waste", "Plastic Containers"],
        created: (1, 19),
    },
    Sample {
        id: "req-003",
        user_id: "test-user-3",
        name: "Arun Patel",
        email: "arun@gmail.com",
        phone: "+91 76543 21098",
        address: "Whitefield, EPIP Zone, Bangalore, Karnataka 560066",
        date: (1, 22),
        waste_types: &["Glass Bottles", "Paper/Cardboard", "Organic Waste"],
        created: (1, 20),
    },
    Sample {
        id: "req-004",
        user_id: "test-user-4",
        name: "Lakshmi Devi",
        email: "lakshmi@gmail.com",
        phone: "+91 65432 10987",
        address: "Indiranagar, 100 Feet Road, Bangalore, Karnataka 560038",
        date: (1, 23),
        waste_types: &["Mixed Plastic", "Metal Cans"],
        created: (1, 21),
    },
];

const SAMPLE_YEAR: i32 = 2024;

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(SAMPLE_YEAR, month, day).expect("sample dates are valid")
}

fn midnight(month: u32, day_of_month: u32) -> DateTime<Utc> {
    day(month, day_of_month).and_time(NaiveTime::MIN).and_utc()
}

impl Sample {
    fn to_request(&self) -> PickupRequest {
        let (first, rest) = self
            .waste_types
            .split_first()
            .expect("sample requests list waste types");

        PickupRequest {
            id: RequestId::new(self.id.to_string()).expect("sample ids are not empty"),
            user_id: self.user_id.to_string(),
            user_name: self.name.to_string(),
            user_email: self.email.to_string(),
            user_phone: self.phone.to_string(),
            user_address: self.address.to_string(),
            date: day(self.date.0, self.date.1),
            waste_types: WasteTypes::new(*first, rest.iter().copied()),
            status: Status::Pending,
            created_at: midnight(self.created.0, self.created.1),
            extra: Map::new(),
        }
    }
}

/// The four pending requests used to populate an empty dashboard.
#[must_use]
pub fn sample_requests() -> Vec<PickupRequest> {
    SAMPLES.iter().map(Sample::to_request).collect()
}
