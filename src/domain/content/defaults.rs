use serde_json::{Map, Value, json};

/// Content tree the site starts from before any admin edits.
pub fn default_content() -> Map<String, Value> {
    let value = json!({
        "site": {
            "name": "CareWell Hospital",
            "tagline": "Compassionate care, advanced medicine",
            "phone": "+1 (555) 010-2040",
            "emergency_phone": "+1 (555) 010-9110",
            "email": "info@carewell.example"
        },
        "hero": {
            "title": "Your Health, Our Priority",
            "subtitle": "World-class specialists and round-the-clock emergency care.",
            "cta_label": "Book an Appointment",
            "image": 0
        },
        "about": {
            "title": "About CareWell",
            "body": "Since 1998 CareWell has served the community with patient-first care across twenty specialties.",
            "stats": [
                { "label": "Specialist doctors", "value": "120+" },
                { "label": "Beds", "value": "450" },
                { "label": "Years of service", "value": "25" }
            ]
        },
        "contact": {
            "address": "1200 Harbor Avenue, Springfield",
            "hours": "Mon-Sat 08:00-20:00, Emergency 24/7",
            "map_url": "https://maps.example/carewell"
        },
        "careers": {
            "intro": "Join a team that puts patients first.",
            "openings": [
                { "title": "Staff Nurse (ICU)", "department": "Critical Care", "type": "Full-time" },
                { "title": "Radiology Technician", "department": "Radiology", "type": "Full-time" }
            ]
        },
        "specialties": [
            { "name": "Cardiology", "description": "Heart and vascular care.", "icon": "heart" },
            { "name": "Neurology", "description": "Brain, spine and nerve disorders.", "icon": "brain" },
            { "name": "Orthopedics", "description": "Bones, joints and sports injuries.", "icon": "bone" },
            { "name": "Pediatrics", "description": "Care for infants, children and teens.", "icon": "baby" }
        ],
        "doctors": [
            {
                "id": "dr-ayesha-khan",
                "name": "Dr. Ayesha Khan",
                "specialty": "Cardiology",
                "image": 0,
                "qualifications": "MBBS, MD (Cardiology)",
                "experience": "15 years",
                "bio": "Interventional cardiologist focused on preventive heart care.",
                "expertise": ["Angioplasty", "Heart failure", "Preventive cardiology"],
                "social": { "linkedin": "https://linkedin.example/ayesha-khan" }
            },
            {
                "id": "dr-imran-khan",
                "name": "Dr. Imran Khan",
                "specialty": "Neurology",
                "image": 1,
                "qualifications": "MBBS, DM (Neurology)",
                "experience": "11 years",
                "bio": "Treats epilepsy, stroke and movement disorders.",
                "expertise": ["Stroke care", "Epilepsy"],
                "social": { "twitter": "https://twitter.example/imrankhan_md" }
            },
            {
                "id": "dr-sarah-mitchell",
                "name": "Dr. Sarah Mitchell",
                "specialty": "Cardiology",
                "image": 2,
                "qualifications": "MD, FACC",
                "experience": "9 years",
                "bio": "Non-invasive cardiology and cardiac imaging.",
                "expertise": ["Echocardiography", "Cardiac MRI"],
                "social": {}
            },
            {
                "id": "dr-rahul-khanna",
                "name": "Dr. Rahul Khanna",
                "specialty": "Orthopedics",
                "image": 3,
                "qualifications": "MS (Ortho)",
                "experience": "13 years",
                "bio": "Joint replacement and sports medicine.",
                "expertise": ["Knee replacement", "Arthroscopy"],
                "social": { "facebook": "https://facebook.example/dr.khanna" }
            },
            {
                "id": "dr-maria-lopez",
                "name": "Dr. Maria Lopez",
                "specialty": "Pediatrics",
                "image": 4,
                "qualifications": "MD (Pediatrics)",
                "experience": "7 years",
                "bio": "General pediatrics and childhood immunization.",
                "expertise": ["Vaccination", "Newborn care"],
                "social": {}
            }
        ],
        "doctor_schedules": {
            "dr-ayesha-khan": {
                "2024-06-03": ["09:00 AM", "10:00 AM", "02:00 PM"],
                "2024-06-05": ["11:00 AM", "03:00 PM"]
            },
            "dr-maria-lopez": {
                "2024-06-04": ["09:00 AM", "12:00 PM"]
            }
        },
        "images": {
            "hero": ["/assets/hero/main.jpg"],
            "doctors": [
                "/assets/doctors/ayesha-khan.jpg",
                "/assets/doctors/imran-khan.jpg",
                "/assets/doctors/sarah-mitchell.jpg",
                "/assets/doctors/rahul-khanna.jpg",
                "/assets/doctors/maria-lopez.jpg"
            ],
            "blog": [
                "/assets/blog/heart-health.jpg",
                "/assets/blog/allergies.jpg",
                "/assets/blog/nutrition.jpg"
            ]
        }
    });

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
