//! Static reference lists used to seed departments, positions and the
//! free-text attributes of generated rows.

/// Catalog department; its identifier is its 1-based position in
/// [`DEPARTMENTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentSeed {
    pub name: &'static str,
    pub description: &'static str,
}

/// Catalog position; its identifier is its 1-based position in
/// [`POSITIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSeed {
    pub title: &'static str,
    pub department_id: u32,
    pub description: &'static str,
}

const fn department(name: &'static str, description: &'static str) -> DepartmentSeed {
    DepartmentSeed { name, description }
}

const fn position(
    title: &'static str,
    department_id: u32,
    description: &'static str,
) -> PositionSeed {
    PositionSeed {
        title,
        department_id,
        description,
    }
}

pub const DEPARTMENTS: &[DepartmentSeed] = &[
    department("Personnel", "Human Resources and personnel management"),
    department("Ticketing", "Handles bookings and ticket issuance"),
    department("Customer Support", "Customer support and post-booking assistance"),
    department("Advertising", "Marketing and ad campaigns"),
    department("Payment Clearing", "Payment processing and reconciliation"),
    department("Operations", "General operations and management"),
    department("Business Development", "New partnerships and deals"),
    department("IT", "Infrastructure and support"),
    department("Legal & Compliance", "Contracts, compliance, licensing"),
    department("Finance", "Budgeting and financial reporting"),
    department("Training", "Employee training and certification"),
    department("Logistics", "Vendor and supplier coordination"),
];

pub const POSITIONS: &[PositionSeed] = &[
    position("HR Manager", 1, "Oversees HR and personnel policies"),
    position("Payroll Specialist", 1, "Handles payroll and benefits processing"),
    position("Recruiter", 1, "Finds and onboards new hires"),
    position("Travel Agent", 2, "Books tickets and builds itineraries"),
    position("Ticketing Supervisor", 2, "Supervises ticketing agents"),
    position("Support Agent", 3, "Frontline customer support"),
    position("Support Supervisor", 3, "Leads support agents"),
    position("Ad Campaign Manager", 4, "Plans and runs ad campaigns"),
    position("Marketing Specialist", 4, "Executes marketing tasks"),
    position("Payments Specialist", 5, "Processes payments and reconciliations"),
    position("Clearing Analyst", 5, "Handles clearing operations"),
    position("Operations Manager", 6, "Oversees operations"),
    position("General Manager", 6, "Top-level operations manager"),
    position("Partnerships Manager", 7, "Handles business partnerships"),
    position("IT Support", 8, "Day-to-day IT support"),
    position("Sysadmin", 8, "Manages servers and deployments"),
    position("Legal Counsel", 9, "Legal advice and contract drafting"),
    position("Compliance Officer", 9, "Regulatory compliance"),
    position("Accountant", 10, "Books and reconciles accounts"),
    position("Financial Analyst", 10, "Analyzes financials"),
    position("Trainer", 11, "Delivers training sessions"),
    position("Training Coordinator", 11, "Schedules and manages training"),
    position("Logistics Coordinator", 12, "Manages logistics tasks"),
    position("Vendor Manager", 12, "Handles supplier relations"),
    position("Senior Travel Agent", 2, "Experienced agent for VIPs"),
    position("Customer Experience Lead", 3, "Improves CX across channels"),
    position("DevOps Engineer", 8, "Automates infrastructure"),
    position("Data Analyst", 10, "Insights from customer and sales data"),
    position("UX Designer", 4, "Designs marketing and web UX"),
    position("Security Specialist", 8, "Information security and monitoring"),
];

pub const FIRST_NAMES: &[&str] = &[
    "Oliver", "Noah", "Liam", "Elijah", "James", "William", "Benjamin", "Lucas", "Henry",
    "Alexander", "Mason", "Michael", "Ethan", "Daniel", "Jacob", "Logan", "Jackson", "Levi",
    "Sebastian", "Mateo", "Jack", "Owen", "Theodore", "Aiden", "Samuel", "Joseph", "John",
    "David", "Wyatt", "Matthew", "Luke", "Asher", "Carter", "Julian", "Grayson", "Leo",
    "Jayden", "Gabriel", "Isaac", "Lincoln", "Anthony", "Hudson", "Dylan", "Ezra", "Thomas",
    "Charles", "Christopher", "Jaxon", "Maverick", "Josiah", "Isaiah", "Andrew", "Elias",
    "Joshua", "Nathan", "Caleb", "Ryan", "Adrian", "Miles", "Eli", "Nolan", "Christian",
    "Aaron", "Cameron", "Ezekiel", "Colton", "Luca", "Landon", "Hunter", "Jonathan",
    "Santiago", "Axel", "Easton", "Cooper", "Jeremiah", "Angel", "Roman", "Connor", "Jameson",
    "Robert", "Greyson", "Jordan", "Ian", "Carson", "Jaxson", "Leonardo", "Nicholas",
    "Dominic", "Austin", "Everett", "Brooks", "Xavier", "Kai", "Jose", "Parker", "Adam",
    "Jace", "Wesley", "Kayden", "Silas", "Bennett", "Declan", "Waylon", "Weston", "Evan",
    "Emmett", "Micah", "Ryder", "Beau", "Damian", "Brayden", "Gael", "Rowan", "Hector",
    "Victor", "Peter", "Max", "Omar", "Harlan", "Rafael", "Shane", "Tristan", "Kody", "Malik",
    "Orion", "Zane", "Finn",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall",
    "Rivera", "Campbell", "Mitchell", "Carter", "Roberts", "Gomez", "Phillips", "Evans",
    "Turner", "Diaz", "Parker", "Cruz", "Edwards", "Collins", "Reyes", "Stewart", "Morris",
    "Morales", "Murphy", "Cook", "Rogers", "Gutierrez", "Ortiz", "Morgan", "Cooper", "Peterson",
    "Bailey", "Reed", "Kelly", "Howard", "Ramos", "Kim", "Cox", "Ward", "Richardson", "Watson",
    "Brooks", "Chavez", "Wood", "James", "Bennett", "Gray", "Mendoza", "Ruiz", "Hughes",
    "Price", "Alvarez", "Castillo", "Sanders", "Patel", "Myers", "Long", "Ross", "Foster",
    "Jimenez", "Powell", "Schultz", "Berg", "Fischer", "Weber", "Keller", "Herrera", "Douglas",
    "Ray", "Holmes", "Stephens", "Gardner", "Spencer", "Bryant", "Lam", "Riley", "Hamilton",
    "Graham", "Reeves", "Sutton", "Pena", "Freeman", "Walters", "Baldwin", "Potter", "Serrano",
    "Figueroa", "Cohen", "Nolan", "Cross",
];

pub const LICENSE_NAMES: &[&str] = &[
    "IATA Agent",
    "Tour Guide Level 1",
    "Tour Guide Level 2",
    "Corporate Travel Cert",
    "Security Screening Training",
    "VAT Handling Cert",
    "Advanced Ticketing Cert",
    "API Access Approval",
    "Customer Privacy Training",
    "AML Awareness",
    "Senior Agent Accreditation",
    "Fraud Prevention Cert",
];

pub const NOTES: &[&str] = &[
    "Top performer in last quarter",
    "Part-time; remote",
    "Preferred contact: phone",
    "Requires special accommodation",
    "Probationary period",
    "Certified travel agent (IATA)",
    "HR flagged: verify documents",
    "Limited authorization for refunds",
    "Full access to ticketing system",
    "Handles VIP accounts",
    "Training scheduled",
    "Fluent in Spanish and English",
    "No night shifts",
    "Can approve discounts up to 10%",
    "Safety trained",
    "Temporary contractor",
    "Under NDA",
    "Background check pending",
    "Eligible for promotion",
    "Receives travel benefits",
];

pub const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Pine", "Cedar", "Elm", "Birch", "Main", "Park", "Lake", "Hill",
];

pub const STREET_SUFFIXES: &[&str] = &["St.", "Ave.", "Blvd.", "Rd.", "Ln.", "Dr."];

pub const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "protonmail.com",
    "icloud.com",
];

/// 1-based identifiers of the positions owned by `department_id`, in
/// catalog order.
pub fn positions_for_department(department_id: u32) -> Vec<u32> {
    POSITIONS
        .iter()
        .zip(1_u32..)
        .filter(|(seed, _)| seed.department_id == department_id)
        .map(|(_, position_id)| position_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn every_position_references_a_catalog_department() {
        let departments = DEPARTMENTS.len() as u32;
        for seed in POSITIONS {
            assert!(
                (1..=departments).contains(&seed.department_id),
                "{} points at missing department {}",
                seed.title,
                seed.department_id
            );
        }
    }

    #[test]
    fn every_department_owns_a_position() {
        for department_id in 1..=DEPARTMENTS.len() as u32 {
            assert!(!positions_for_department(department_id).is_empty());
        }
    }

    #[test]
    fn position_titles_are_unique() {
        let titles: BTreeSet<_> = POSITIONS.iter().map(|seed| seed.title).collect();
        assert_eq!(titles.len(), POSITIONS.len());
    }

    #[test]
    fn positions_for_it_department() {
        assert_eq!(positions_for_department(8), vec![15, 16, 27, 30]);
        assert!(positions_for_department(99).is_empty());
    }
}
