//! Static itinerary templates. `{destination}` in any text is replaced with the
//! trip's destination name when a template is instantiated.

use crate::content::{ActivityType, MealType};

pub(crate) struct ActivityTemplate {
    pub key: &'static str,
    pub activity_type: ActivityType,
    pub title: &'static str,
    pub description: &'static str,
    pub start: (u32, u32),
    pub duration_minutes: u32,
    pub location: &'static str,
    pub cost: Option<f64>,
    pub tips: &'static [&'static str],
    pub booking_required: bool,
}

pub(crate) struct MealTemplate {
    pub meal_type: MealType,
    pub suggestion: &'static str,
    pub estimated_cost: f64,
}

pub(crate) struct DayTemplate {
    pub title: &'static str,
    pub activities: &'static [ActivityTemplate],
    pub meals: &'static [MealTemplate],
    pub notes: &'static [&'static str],
}

pub(crate) struct DestinationProfile {
    pub name: &'static str,
    pub country: &'static str,
    pub base_high_c: i32,
    pub exploration: [DayTemplate; 3],
    pub phrases: &'static [(&'static str, &'static str, &'static str)],
    pub cultural_tips: &'static [&'static str],
    pub safety_tips: &'static [&'static str],
    pub emergency_contacts: &'static [(&'static str, &'static str)],
}

/// Exact, case-sensitive lookup by destination name.
pub(crate) fn destination_profile(name: &str) -> Option<&'static DestinationProfile> {
    DESTINATIONS.iter().find(|profile| profile.name == name)
}

pub(crate) fn known_destinations() -> impl Iterator<Item = &'static str> {
    DESTINATIONS.iter().map(|profile| profile.name)
}

pub(crate) static ARRIVAL_DAY: DayTemplate = DayTemplate {
    title: "Arrival Day",
    activities: &[
        ActivityTemplate {
            key: "arrival-transfer",
            activity_type: ActivityType::Transport,
            title: "Arrive and transfer to your stay",
            description: "Land in {destination} and head to your accommodation.",
            start: (10, 0),
            duration_minutes: 90,
            location: "{destination} arrival hub",
            cost: Some(35.0),
            tips: &["Keep digital copies of your booking confirmations handy"],
            booking_required: false,
        },
        ActivityTemplate {
            key: "arrival-checkin",
            activity_type: ActivityType::Accommodation,
            title: "Check in and freshen up",
            description: "Drop your bags and take a short rest after travelling.",
            start: (14, 0),
            duration_minutes: 60,
            location: "Your accommodation",
            cost: None,
            tips: &["Ask the front desk for a neighbourhood map"],
            booking_required: true,
        },
        ActivityTemplate {
            key: "arrival-walk",
            activity_type: ActivityType::Sightseeing,
            title: "Orientation walk",
            description: "An easy first stroll to get your bearings in {destination}.",
            start: (16, 30),
            duration_minutes: 120,
            location: "{destination} old town",
            cost: None,
            tips: &["Note the nearest pharmacy and transit stop"],
            booking_required: false,
        },
    ],
    meals: &[
        MealTemplate {
            meal_type: MealType::Lunch,
            suggestion: "Light lunch near your accommodation",
            estimated_cost: 20.0,
        },
        MealTemplate {
            meal_type: MealType::Dinner,
            suggestion: "Welcome dinner at a well-reviewed local spot",
            estimated_cost: 40.0,
        },
    ],
    notes: &["Keep the first evening light to recover from travel"],
};

pub(crate) static DEPARTURE_DAY: DayTemplate = DayTemplate {
    title: "Departure Day",
    activities: &[
        ActivityTemplate {
            key: "departure-breakfast",
            activity_type: ActivityType::Dining,
            title: "Farewell breakfast",
            description: "A relaxed last breakfast in {destination}.",
            start: (8, 30),
            duration_minutes: 60,
            location: "{destination} café district",
            cost: Some(15.0),
            tips: &["Settle any outstanding bills the evening before"],
            booking_required: false,
        },
        ActivityTemplate {
            key: "departure-souvenirs",
            activity_type: ActivityType::Shopping,
            title: "Last-minute souvenirs",
            description: "Pick up gifts and local treats before you leave.",
            start: (10, 0),
            duration_minutes: 90,
            location: "{destination} market",
            cost: Some(30.0),
            tips: &["Check liquid limits before buying food gifts"],
            booking_required: false,
        },
        ActivityTemplate {
            key: "departure-checkout",
            activity_type: ActivityType::Transport,
            title: "Check out and transfer",
            description: "Check out and travel to your departure point.",
            start: (12, 0),
            duration_minutes: 120,
            location: "{destination} departure hub",
            cost: Some(35.0),
            tips: &["Leave at least three hours for international departures"],
            booking_required: false,
        },
    ],
    meals: &[MealTemplate {
        meal_type: MealType::Breakfast,
        suggestion: "Bakery breakfast close to your accommodation",
        estimated_cost: 15.0,
    }],
    notes: &["Confirm your transfer time the night before"],
};

pub(crate) static GENERIC_EXPLORATION: [DayTemplate; 3] = [
    DayTemplate {
        title: "Exploring {destination}",
        activities: &[
            ActivityTemplate {
                key: "explore-landmarks",
                activity_type: ActivityType::Sightseeing,
                title: "Landmark tour",
                description: "Visit the best-known sights of {destination}.",
                start: (9, 0),
                duration_minutes: 180,
                location: "{destination} city centre",
                cost: Some(25.0),
                tips: &["Start early to beat the crowds"],
                booking_required: false,
            },
            ActivityTemplate {
                key: "explore-museum",
                activity_type: ActivityType::Culture,
                title: "Main museum visit",
                description: "Spend the afternoon in the city's flagship museum.",
                start: (14, 0),
                duration_minutes: 150,
                location: "{destination} museum quarter",
                cost: Some(20.0),
                tips: &["Many museums have a free or reduced entry day"],
                booking_required: true,
            },
        ],
        meals: &[
            MealTemplate {
                meal_type: MealType::Lunch,
                suggestion: "Street food near the main square",
                estimated_cost: 15.0,
            },
            MealTemplate {
                meal_type: MealType::Dinner,
                suggestion: "Traditional restaurant recommended by locals",
                estimated_cost: 35.0,
            },
        ],
        notes: &["Wear comfortable walking shoes"],
    },
    DayTemplate {
        title: "Local Culture & Cuisine",
        activities: &[
            ActivityTemplate {
                key: "culture-market",
                activity_type: ActivityType::Shopping,
                title: "Morning market",
                description: "Browse the local produce and craft market.",
                start: (9, 30),
                duration_minutes: 120,
                location: "{destination} central market",
                cost: None,
                tips: &["Carry small change for market stalls"],
                booking_required: false,
            },
            ActivityTemplate {
                key: "culture-cooking",
                activity_type: ActivityType::Dining,
                title: "Cooking class",
                description: "Learn to cook a regional dish with a local chef.",
                start: (13, 0),
                duration_minutes: 180,
                location: "{destination} culinary studio",
                cost: Some(60.0),
                tips: &["Mention dietary restrictions when booking"],
                booking_required: true,
            },
        ],
        meals: &[MealTemplate {
            meal_type: MealType::Dinner,
            suggestion: "Neighbourhood tavern",
            estimated_cost: 30.0,
        }],
        notes: &["Lunch is included in the cooking class"],
    },
    DayTemplate {
        title: "Hidden Gems",
        activities: &[
            ActivityTemplate {
                key: "gems-neighbourhood",
                activity_type: ActivityType::Sightseeing,
                title: "Off-the-beaten-path neighbourhood",
                description: "Wander a residential quarter most visitors skip.",
                start: (10, 0),
                duration_minutes: 150,
                location: "{destination} outskirts",
                cost: None,
                tips: &["Public transport day passes usually pay off"],
                booking_required: false,
            },
            ActivityTemplate {
                key: "gems-viewpoint",
                activity_type: ActivityType::Outdoor,
                title: "Sunset viewpoint",
                description: "Catch the sunset from a local favourite viewpoint.",
                start: (18, 0),
                duration_minutes: 90,
                location: "{destination} hills",
                cost: None,
                tips: &["Bring a light jacket for the evening"],
                booking_required: false,
            },
        ],
        meals: &[
            MealTemplate {
                meal_type: MealType::Lunch,
                suggestion: "Family-run café",
                estimated_cost: 18.0,
            },
            MealTemplate {
                meal_type: MealType::Dinner,
                suggestion: "Rooftop dinner with a view",
                estimated_cost: 45.0,
            },
        ],
        notes: &["Keep this day flexible for anything you discovered earlier"],
    },
];

pub(crate) static GENERIC_PHRASES: &[(&str, &str, &str)] = &[
    ("Hello", "Hello", "heh-LOH"),
    ("Thank you", "Thank you", "THANK-yoo"),
    ("How much?", "How much?", "how-MUCH"),
];

pub(crate) static GENERIC_CULTURAL_TIPS: &[&str] = &[
    "Learn a few words of the local language; it is always appreciated",
    "Check local tipping customs before your first meal out",
    "Dress modestly when visiting religious sites",
];

pub(crate) static GENERIC_SAFETY_TIPS: &[&str] = &[
    "Keep copies of your passport and insurance separate from the originals",
    "Use licensed taxis or ride-hailing apps at night",
    "Watch your belongings in crowded tourist areas",
];

pub(crate) static GENERIC_EMERGENCY: &[(&str, &str)] = &[("International emergency (GSM)", "112")];

static DESTINATIONS: [DestinationProfile; 3] = [
    DestinationProfile {
        name: "Paris",
        country: "France",
        base_high_c: 22,
        exploration: [
            DayTemplate {
                title: "Iconic Paris",
                activities: &[
                    ActivityTemplate {
                        key: "paris-eiffel",
                        activity_type: ActivityType::Sightseeing,
                        title: "Eiffel Tower summit",
                        description: "Ride to the top for views across the city.",
                        start: (9, 0),
                        duration_minutes: 150,
                        location: "Champ de Mars",
                        cost: Some(29.0),
                        tips: &["Book a timed ticket online to skip the queue"],
                        booking_required: true,
                    },
                    ActivityTemplate {
                        key: "paris-seine",
                        activity_type: ActivityType::Leisure,
                        title: "Seine river cruise",
                        description: "A one-hour cruise past Notre-Dame and the Louvre.",
                        start: (15, 0),
                        duration_minutes: 60,
                        location: "Port de la Bourdonnais",
                        cost: Some(17.0),
                        tips: &["Sit on the upper deck for photos"],
                        booking_required: false,
                    },
                ],
                meals: &[
                    MealTemplate {
                        meal_type: MealType::Lunch,
                        suggestion: "Croque-monsieur at a Left Bank brasserie",
                        estimated_cost: 22.0,
                    },
                    MealTemplate {
                        meal_type: MealType::Dinner,
                        suggestion: "Bistro dinner in Saint-Germain",
                        estimated_cost: 45.0,
                    },
                ],
                notes: &["Many museums close on Mondays or Tuesdays"],
            },
            DayTemplate {
                title: "Art & Montmartre",
                activities: &[
                    ActivityTemplate {
                        key: "paris-louvre",
                        activity_type: ActivityType::Culture,
                        title: "The Louvre",
                        description: "Highlights tour of the world's largest art museum.",
                        start: (9, 0),
                        duration_minutes: 210,
                        location: "Musée du Louvre",
                        cost: Some(22.0),
                        tips: &["Use the Carrousel entrance to avoid the pyramid queue"],
                        booking_required: true,
                    },
                    ActivityTemplate {
                        key: "paris-montmartre",
                        activity_type: ActivityType::Sightseeing,
                        title: "Montmartre and Sacré-Cœur",
                        description: "Wander the artists' hill and visit the basilica.",
                        start: (15, 0),
                        duration_minutes: 150,
                        location: "Montmartre",
                        cost: None,
                        tips: &["Beware of bracelet sellers at the basilica steps"],
                        booking_required: false,
                    },
                ],
                meals: &[MealTemplate {
                    meal_type: MealType::Dinner,
                    suggestion: "Steak-frites near Place du Tertre",
                    estimated_cost: 38.0,
                }],
                notes: &["The funicular up to Sacré-Cœur takes a metro ticket"],
            },
            DayTemplate {
                title: "Palaces & Gardens",
                activities: &[
                    ActivityTemplate {
                        key: "paris-versailles",
                        activity_type: ActivityType::Culture,
                        title: "Palace of Versailles",
                        description: "Day trip to the royal palace and its gardens.",
                        start: (9, 30),
                        duration_minutes: 300,
                        location: "Versailles",
                        cost: Some(21.0),
                        tips: &["Take the RER C and arrive before opening"],
                        booking_required: true,
                    },
                    ActivityTemplate {
                        key: "paris-marais",
                        activity_type: ActivityType::Nightlife,
                        title: "Evening in Le Marais",
                        description: "Wine bars and galleries in the historic quarter.",
                        start: (19, 0),
                        duration_minutes: 150,
                        location: "Le Marais",
                        cost: Some(30.0),
                        tips: &["Many bars have happy hour until 20:00"],
                        booking_required: false,
                    },
                ],
                meals: &[MealTemplate {
                    meal_type: MealType::Lunch,
                    suggestion: "Picnic in the Versailles gardens",
                    estimated_cost: 15.0,
                }],
                notes: &["The fountains show runs on weekends in summer"],
            },
        ],
        phrases: &[
            ("Bonjour", "Hello", "bohn-ZHOOR"),
            ("Merci beaucoup", "Thank you very much", "mehr-SEE boh-KOO"),
            ("L'addition, s'il vous plaît", "The bill, please", "lah-dee-SYOHN seel voo PLEH"),
            ("Parlez-vous anglais ?", "Do you speak English?", "par-LAY voo ahn-GLEH"),
        ],
        cultural_tips: &[
            "Always greet shopkeepers with 'Bonjour' when entering",
            "Service is included in the bill; rounding up is enough",
            "Dinner rarely starts before 19:30",
        ],
        safety_tips: &["Pickpockets target the metro line 1 and around major sights"],
        emergency_contacts: &[
            ("European emergency number", "112"),
            ("Police", "17"),
            ("Ambulance (SAMU)", "15"),
        ],
    },
    DestinationProfile {
        name: "Tokyo",
        country: "Japan",
        base_high_c: 25,
        exploration: [
            DayTemplate {
                title: "Traditional Tokyo",
                activities: &[
                    ActivityTemplate {
                        key: "tokyo-sensoji",
                        activity_type: ActivityType::Culture,
                        title: "Senso-ji Temple",
                        description: "Tokyo's oldest temple and the Nakamise shopping street.",
                        start: (8, 30),
                        duration_minutes: 120,
                        location: "Asakusa",
                        cost: None,
                        tips: &["Arrive before 9:00 for a calm visit"],
                        booking_required: false,
                    },
                    ActivityTemplate {
                        key: "tokyo-meiji",
                        activity_type: ActivityType::Outdoor,
                        title: "Meiji Shrine forest walk",
                        description: "A shaded walk to the shrine in the heart of the city.",
                        start: (13, 0),
                        duration_minutes: 90,
                        location: "Harajuku",
                        cost: None,
                        tips: &["Bow once at the torii gate before entering"],
                        booking_required: false,
                    },
                ],
                meals: &[
                    MealTemplate {
                        meal_type: MealType::Lunch,
                        suggestion: "Tempura set in Asakusa",
                        estimated_cost: 18.0,
                    },
                    MealTemplate {
                        meal_type: MealType::Dinner,
                        suggestion: "Izakaya in Shibuya",
                        estimated_cost: 35.0,
                    },
                ],
                notes: &["Get a Suica card for trains and convenience stores"],
            },
            DayTemplate {
                title: "Modern Tokyo",
                activities: &[
                    ActivityTemplate {
                        key: "tokyo-tsukiji",
                        activity_type: ActivityType::Dining,
                        title: "Tsukiji outer market breakfast",
                        description: "Fresh sushi and street snacks at the outer market.",
                        start: (8, 0),
                        duration_minutes: 90,
                        location: "Tsukiji",
                        cost: Some(25.0),
                        tips: &["Many stalls close by early afternoon"],
                        booking_required: false,
                    },
                    ActivityTemplate {
                        key: "tokyo-teamlab",
                        activity_type: ActivityType::Culture,
                        title: "teamLab digital art museum",
                        description: "Immersive digital art installations.",
                        start: (14, 0),
                        duration_minutes: 150,
                        location: "Toyosu",
                        cost: Some(28.0),
                        tips: &["Wear shorts; some rooms have ankle-deep water"],
                        booking_required: true,
                    },
                ],
                meals: &[MealTemplate {
                    meal_type: MealType::Dinner,
                    suggestion: "Ramen in Shinjuku's Omoide Yokocho",
                    estimated_cost: 15.0,
                }],
                notes: &["Trains stop running shortly after midnight"],
            },
            DayTemplate {
                title: "Neighbourhoods & Nightlife",
                activities: &[
                    ActivityTemplate {
                        key: "tokyo-yanaka",
                        activity_type: ActivityType::Sightseeing,
                        title: "Yanaka old town",
                        description: "Old wooden houses, temples and craft shops.",
                        start: (10, 0),
                        duration_minutes: 150,
                        location: "Yanaka",
                        cost: None,
                        tips: &["Try the local taiyaki on Yanaka Ginza"],
                        booking_required: false,
                    },
                    ActivityTemplate {
                        key: "tokyo-shibuya",
                        activity_type: ActivityType::Nightlife,
                        title: "Shibuya Sky and the scramble crossing",
                        description: "Observation deck views followed by the famous crossing.",
                        start: (18, 0),
                        duration_minutes: 120,
                        location: "Shibuya",
                        cost: Some(15.0),
                        tips: &["Book sunset slots well in advance"],
                        booking_required: true,
                    },
                ],
                meals: &[MealTemplate {
                    meal_type: MealType::Lunch,
                    suggestion: "Soba at a neighbourhood counter",
                    estimated_cost: 12.0,
                }],
                notes: &["Carry cash; smaller shops may not take cards"],
            },
        ],
        phrases: &[
            ("Konnichiwa", "Hello", "kohn-nee-chee-wah"),
            ("Arigatou gozaimasu", "Thank you very much", "ah-ree-gah-toh go-zai-mas"),
            ("Sumimasen", "Excuse me", "soo-mee-mah-sen"),
            ("Eigo o hanasemasu ka?", "Do you speak English?", "ay-go oh hah-nah-seh-mas kah"),
        ],
        cultural_tips: &[
            "Tipping is not customary and can cause confusion",
            "Remove your shoes when entering homes and some restaurants",
            "Keep phone calls off on trains",
        ],
        safety_tips: &["Earthquake drills: note the evacuation map in your hotel room"],
        emergency_contacts: &[("Police", "110"), ("Fire and ambulance", "119")],
    },
    DestinationProfile {
        name: "Barcelona",
        country: "Spain",
        base_high_c: 26,
        exploration: [
            DayTemplate {
                title: "Gaudí's Barcelona",
                activities: &[
                    ActivityTemplate {
                        key: "barcelona-sagrada",
                        activity_type: ActivityType::Culture,
                        title: "Sagrada Família",
                        description: "Guided visit of Gaudí's unfinished basilica.",
                        start: (9, 0),
                        duration_minutes: 120,
                        location: "Eixample",
                        cost: Some(33.0),
                        tips: &["Tickets sell out days ahead in high season"],
                        booking_required: true,
                    },
                    ActivityTemplate {
                        key: "barcelona-guell",
                        activity_type: ActivityType::Outdoor,
                        title: "Park Güell",
                        description: "Mosaic terraces with views over the city.",
                        start: (15, 0),
                        duration_minutes: 120,
                        location: "Gràcia",
                        cost: Some(10.0),
                        tips: &["Take the bus up; the walk is steep"],
                        booking_required: true,
                    },
                ],
                meals: &[
                    MealTemplate {
                        meal_type: MealType::Lunch,
                        suggestion: "Menú del día in Eixample",
                        estimated_cost: 16.0,
                    },
                    MealTemplate {
                        meal_type: MealType::Dinner,
                        suggestion: "Tapas crawl in Gràcia",
                        estimated_cost: 35.0,
                    },
                ],
                notes: &["Lunch is the main meal of the day"],
            },
            DayTemplate {
                title: "Gothic Quarter & the Sea",
                activities: &[
                    ActivityTemplate {
                        key: "barcelona-gothic",
                        activity_type: ActivityType::Sightseeing,
                        title: "Gothic Quarter walk",
                        description: "Medieval lanes, the cathedral and Plaça del Rei.",
                        start: (10, 0),
                        duration_minutes: 150,
                        location: "Barri Gòtic",
                        cost: None,
                        tips: &["Keep bags zipped on Las Ramblas"],
                        booking_required: false,
                    },
                    ActivityTemplate {
                        key: "barcelona-beach",
                        activity_type: ActivityType::Leisure,
                        title: "Barceloneta beach",
                        description: "Afternoon by the sea and a seafront promenade.",
                        start: (15, 30),
                        duration_minutes: 180,
                        location: "Barceloneta",
                        cost: None,
                        tips: &["Never leave belongings unattended on the sand"],
                        booking_required: false,
                    },
                ],
                meals: &[MealTemplate {
                    meal_type: MealType::Dinner,
                    suggestion: "Seafood paella by the port",
                    estimated_cost: 40.0,
                }],
                notes: &["Dinner usually starts after 21:00"],
            },
            DayTemplate {
                title: "Montjuïc & Markets",
                activities: &[
                    ActivityTemplate {
                        key: "barcelona-boqueria",
                        activity_type: ActivityType::Dining,
                        title: "La Boqueria market",
                        description: "Fresh juices, jamón and local produce.",
                        start: (9, 30),
                        duration_minutes: 90,
                        location: "La Rambla",
                        cost: Some(15.0),
                        tips: &["Stalls deeper inside are cheaper"],
                        booking_required: false,
                    },
                    ActivityTemplate {
                        key: "barcelona-montjuic",
                        activity_type: ActivityType::Outdoor,
                        title: "Montjuïc cable car and castle",
                        description: "Cable car up the hill, then the castle walls.",
                        start: (13, 0),
                        duration_minutes: 180,
                        location: "Montjuïc",
                        cost: Some(16.0),
                        tips: &["The magic fountain show runs on select evenings"],
                        booking_required: false,
                    },
                ],
                meals: &[MealTemplate {
                    meal_type: MealType::Lunch,
                    suggestion: "Vermouth and tapas in Poble-sec",
                    estimated_cost: 20.0,
                }],
                notes: &["Most shops close for a break in the afternoon"],
            },
        ],
        phrases: &[
            ("Hola", "Hello", "OH-lah"),
            ("Gràcies", "Thank you (Catalan)", "GRAH-see-es"),
            ("La cuenta, por favor", "The bill, please", "lah KWEN-tah por fah-VOR"),
            ("¿Habla inglés?", "Do you speak English?", "AH-blah een-GLEHS"),
        ],
        cultural_tips: &[
            "Catalan is the first language here; a 'gràcies' goes a long way",
            "Tipping is modest; rounding up is common",
            "Beachwear belongs on the beach, not in the city centre",
        ],
        safety_tips: &["Las Ramblas and the metro are pickpocket hotspots"],
        emergency_contacts: &[("European emergency number", "112"), ("Local police", "092")],
    },
];
