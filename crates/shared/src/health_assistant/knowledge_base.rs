#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub keyword: &'static str,
    pub response: &'static str,
}

// Order matters: the first keyword contained in the query wins.
const ENTRIES: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        keyword: "headache",
        response: "Headaches can be caused by stress, dehydration, lack of sleep, or more serious conditions. For occasional headaches, rest, hydration, and over-the-counter pain relievers may help. If headaches are severe or persistent, please consult a healthcare provider.",
    },
    KnowledgeEntry {
        keyword: "cold",
        response: "Common cold symptoms include runny nose, sore throat, cough, and mild fever. Rest, fluids, and over-the-counter cold medicines can help manage symptoms. If symptoms worsen or persist beyond 10 days, consider consulting a healthcare provider.",
    },
    KnowledgeEntry {
        keyword: "fever",
        response: "Fever is often a sign that your body is fighting an infection. Rest, hydration, and over-the-counter fever reducers may help. For high fevers (above 103°F/39.4°C) or fevers that persist for more than three days, please seek medical attention.",
    },
    KnowledgeEntry {
        keyword: "diabetes",
        response: "Diabetes is a chronic condition that affects how your body processes blood sugar. Common symptoms include increased thirst, frequent urination, and fatigue. Management typically involves monitoring blood sugar, medication, healthy eating, and regular exercise. Always consult healthcare providers for proper diagnosis and treatment.",
    },
    KnowledgeEntry {
        keyword: "blood pressure",
        response: "Blood pressure measurements include systolic (top number) and diastolic (bottom number) pressures. Normal is generally considered below 120/80 mmHg. Lifestyle changes like regular exercise, healthy diet, limiting sodium, and reducing stress can help manage blood pressure.",
    },
    KnowledgeEntry {
        keyword: "anxiety",
        response: "Anxiety is a normal response to stress, but persistent worry, restlessness, a racing heart, or trouble concentrating may point to an anxiety disorder. Breathing exercises, regular physical activity, limiting caffeine, and talking to someone you trust can help. If anxiety interferes with daily life, a mental health professional can offer effective treatment.",
    },
    KnowledgeEntry {
        keyword: "depression",
        response: "Depression is more than feeling sad for a few days. Signs include persistent low mood, loss of interest in activities, changes in sleep or appetite, fatigue, and feelings of worthlessness lasting two weeks or more. Depression is treatable with therapy, medication, or both. If you have thoughts of harming yourself, contact emergency services or a crisis line right away.",
    },
    KnowledgeEntry {
        keyword: "stress",
        response: "Short-term stress is a normal part of life, but chronic stress can affect sleep, mood, digestion, and blood pressure. Regular exercise, adequate sleep, relaxation techniques, and setting realistic priorities can help. If stress feels unmanageable, consider speaking with a counselor or healthcare provider.",
    },
    KnowledgeEntry {
        keyword: "sleep",
        response: "Most adults need 7 to 9 hours of sleep per night. Keeping a consistent schedule, limiting screens and caffeine before bed, and keeping your bedroom cool, dark, and quiet can improve sleep quality. Ongoing trouble falling or staying asleep, loud snoring, or daytime exhaustion are worth discussing with a healthcare provider.",
    },
    KnowledgeEntry {
        keyword: "allergy",
        response: "Allergies happen when the immune system overreacts to substances like pollen, dust mites, pet dander, or certain foods. Symptoms range from sneezing and itchy eyes to hives. Avoiding triggers and over-the-counter antihistamines often help. Swelling of the face or throat or difficulty breathing is an emergency that needs immediate care.",
    },
    KnowledgeEntry {
        keyword: "nutrition",
        response: "A balanced diet includes plenty of vegetables, fruits, whole grains, lean proteins, and healthy fats, while limiting added sugars, salt, and highly processed foods. Staying hydrated matters too. Nutritional needs vary with age, activity level, and health conditions, so a registered dietitian can help tailor a plan for you.",
    },
    KnowledgeEntry {
        keyword: "exercise",
        response: "Adults are generally advised to get at least 150 minutes of moderate aerobic activity per week, plus muscle-strengthening activities on two or more days. Start slowly, warm up, and choose activities you enjoy. If you have a chronic condition or have been inactive, check with a healthcare provider before starting a new routine.",
    },
];

pub fn entries() -> &'static [KnowledgeEntry] {
    ENTRIES
}

/// Returns the first entry whose keyword appears anywhere in the lowercased query.
pub fn lookup(query: &str) -> Option<&'static KnowledgeEntry> {
    let normalized = query.to_lowercase();
    ENTRIES
        .iter()
        .find(|entry| normalized.contains(entry.keyword))
}
