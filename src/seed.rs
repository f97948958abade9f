//! Default content inserted the first time an empty store is read.
//! These literals are the single source of truth for seed data; tests
//! assert against them directly.

use crate::models::about::AboutForm;
use crate::models::profile::ProfileForm;
use crate::models::project::ProjectForm;
use crate::models::stat::StatForm;

pub fn default_profile() -> ProfileForm {
    ProfileForm {
        greeting: "Hello, I am".to_string(),
        name: "Naveen".to_string(),
        title: "Data Scientist".to_string(),
        bio: "Hello! I'm Naveen, a Data Scientist skilled in Machine Learning, Python, and SQL. \
              I love turning complex data into clear insights that help solve real-world problems."
            .to_string(),
        skills: vec![
            "MACHINE LEARNING".to_string(),
            "PYTHON".to_string(),
            "SQL".to_string(),
            "NUMPY".to_string(),
            "PANDAS".to_string(),
        ],
        profile_image:
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=400&fit=crop&crop=face"
                .to_string(),
        resume_url: "#".to_string(),
        linkedin_url: "#".to_string(),
        github_url: "#".to_string(),
    }
}

pub fn default_stats() -> Vec<StatForm> {
    vec![
        StatForm {
            number: "1".to_string(),
            label: "Python Project".to_string(),
            icon: "🐍".to_string(),
            background: "#3776ab".to_string(),
            sort_order: 1,
        },
        StatForm {
            number: "2".to_string(),
            label: "ML Projects".to_string(),
            icon: "🤖".to_string(),
            background: "#ff6b6b".to_string(),
            sort_order: 2,
        },
        StatForm {
            number: "1".to_string(),
            label: "SQL Project".to_string(),
            icon: "🗃️".to_string(),
            background: "#336791".to_string(),
            sort_order: 3,
        },
    ]
}

pub fn default_about() -> AboutForm {
    AboutForm {
        description: "Hello! I'm Naveen, a Data Scientist skilled in Machine Learning, Python, \
                      and SQL. I love turning complex data into clear insights that help solve \
                      real-world problems."
            .to_string(),
        tools: vec![
            "🔹 I use Python to handle data and create models that learn from it.".to_string(),
            "🔹 I'm good with SQL for organizing and retrieving data.".to_string(),
            "🔹 I also work with tools like Jupyter Notebooks, Pandas, and Matplotlib.".to_string(),
        ],
        expertise: vec![
            "🔹 Building models that predict future trends and improve business decisions."
                .to_string(),
            "🔹 Making data tasks faster and more accurate with automation.".to_string(),
            "🔹 Designing easy-to-understand data visualizations for better decision-making."
                .to_string(),
        ],
        conclusion: "I believe in the power of learning from data and constantly improving. \
                     I enjoy sharing what I learn and connecting with others!"
            .to_string(),
    }
}

pub fn default_projects() -> Vec<ProjectForm> {
    vec![
        ProjectForm {
            id: None,
            title: "AtliQ Hotels Data Analysis Project".to_string(),
            domain: "Hospitality".to_string(),
            badge: "Python Project".to_string(),
            description: "AtliQ Grands faced declining market share due to a lack of data \
                          analytics capabilities. Tasked with analyzing historical data, I used \
                          Pandas in Jupyter Notebook for exploratory analysis, identifying \
                          crucial inefficiencies. The insights gained led to a 10% rise in \
                          occupancy rates and a 15% increase in satisfaction scores on key \
                          platforms."
                .to_string(),
            details: "Situation: AtliQ Grands faced declining market share and revenue in a \
                      competitive sector without internal data analytics capabilities.\n\n\
                      Task: I was tasked to analyze historical data and derive insights to \
                      improve market position and revenue.\n\n\
                      Action: Using Pandas in Jupyter Notebook, I conducted exploratory data \
                      analysis to identify key performance trends and inefficiencies.\n\n\
                      Result: The insights led to a 10% increase in occupancy rates and a 15% \
                      improvement in satisfaction scores on major booking platforms."
                .to_string(),
            card_gradient: "linear-gradient(45deg, #FFD700, #FFA500)".to_string(),
            card_label: "HOTEL BOOKINGS".to_string(),
            youtube_id: Some("xkx7hbKh6Ec".to_string()),
            github_url: Some("#".to_string()),
            images: vec![
                "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=400&h=300&fit=crop"
                    .to_string(),
                "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=400&h=300&fit=crop"
                    .to_string(),
            ],
            published: true,
            sort_order: 1,
        },
        ProjectForm {
            id: None,
            title: "Price Range Prediction".to_string(),
            domain: "Food & Beverages".to_string(),
            badge: "ML Project".to_string(),
            description: "Develop a predictive model that will assist in finding a price range \
                          that avoids the risks of overpricing or underpricing the product based \
                          on various features."
                .to_string(),
            details: "Situation: Need to develop an accurate pricing strategy for food & \
                      beverage products.\n\n\
                      Task: Create a machine learning model to predict optimal price ranges.\n\n\
                      Action: Implemented various ML algorithms and performed feature \
                      engineering.\n\n\
                      Result: Achieved high accuracy in price prediction, helping optimize \
                      pricing strategies."
                .to_string(),
            card_gradient: "linear-gradient(45deg, #4169E1, #1E90FF)".to_string(),
            card_label: "PRICE PREDICTION".to_string(),
            youtube_id: None,
            github_url: Some("#".to_string()),
            images: vec![
                "https://images.unsplash.com/photo-1518186285589-2f7649de83e0?w=400&h=300&fit=crop"
                    .to_string(),
            ],
            published: true,
            sort_order: 2,
        },
        ProjectForm {
            id: None,
            title: "Healthcare Premium Prediction".to_string(),
            domain: "Healthcare".to_string(),
            badge: "ML Project".to_string(),
            description: "Developed a high accuracy predictive model to estimate healthcare \
                          insurance premiums based on factors such as age, smoking habits, BMI, \
                          and other relevant variables."
                .to_string(),
            details: "Situation: Healthcare insurance companies need accurate premium \
                      estimation.\n\n\
                      Task: Build a regression model to predict insurance premiums.\n\n\
                      Action: Used advanced regression techniques and feature selection.\n\n\
                      Result: Created a highly accurate model for premium prediction."
                .to_string(),
            card_gradient: "linear-gradient(45deg, #87CEEB, #4682B4)".to_string(),
            card_label: "HEALTHCARE PREDICTION".to_string(),
            youtube_id: None,
            github_url: Some("#".to_string()),
            images: vec![
                "https://images.unsplash.com/photo-1576091160399-112ba8d25d1f?w=400&h=300&fit=crop"
                    .to_string(),
            ],
            published: true,
            sort_order: 3,
        },
    ]
}
