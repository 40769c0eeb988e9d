//! Keyword-matched topic templates for blog content generation.

use super::{ContentGenerator, GeneratedContent, GeneratorError};
use crate::constants::EXCERPT_MAX_LEN;
use async_trait::async_trait;
use rand::Rng;

struct Topic {
    keywords: &'static [&'static str],
    body: &'static str,
}

static TOPICS: &[Topic] = &[
    Topic {
        keywords: &["innovation", "startup", "disrupt"],
        body: "Innovation is the cornerstone of successful entrepreneurship. In today's rapidly evolving business landscape, entrepreneurs must continuously seek new ways to create value and solve problems. This involves understanding market gaps, leveraging technology, and building scalable solutions that can adapt to changing consumer needs.\n\nThe startup ecosystem has evolved significantly over the past decade. Entrepreneurs now have access to more resources, funding opportunities, and support networks than ever before. However, this also means increased competition and the need for more sophisticated business strategies.\n\nKey principles for successful innovation include:\n\u{2022} Customer-centric approach: Always start with understanding your target audience\n\u{2022} Rapid prototyping: Test ideas quickly and iterate based on feedback\n\u{2022} Scalability: Build solutions that can grow with your business\n\u{2022} Sustainability: Consider long-term impact and environmental responsibility\n\nModern entrepreneurs must also navigate digital transformation, which has changed how businesses operate, market themselves, and serve customers. This includes understanding e-commerce, social media marketing, data analytics, and digital customer experience.\n\nThe future of entrepreneurship lies in combining traditional business acumen with technological innovation, creating solutions that are both profitable and socially responsible.",
    },
    Topic {
        keywords: &["leadership", "team", "management"],
        body: "Effective leadership is crucial for entrepreneurial success. Building and managing a team requires a unique set of skills that go beyond technical expertise. Entrepreneurs must inspire, motivate, and guide their teams while making strategic decisions under uncertainty.\n\nLeadership in entrepreneurship involves several key components:\n\u{2022} Vision communication: Clearly articulating the company's mission and goals\n\u{2022} Team building: Recruiting the right people and fostering collaboration\n\u{2022} Decision making: Making informed choices with limited information\n\u{2022} Adaptability: Adjusting strategies based on market feedback and changes\n\nThe entrepreneurial journey is filled with challenges that test leadership abilities. From securing funding to scaling operations, leaders must maintain resilience and inspire confidence in their teams and stakeholders.\n\nModern leadership also requires understanding diverse perspectives, promoting inclusion, and creating environments where innovation can flourish. This includes recognizing different working styles, cultural backgrounds, and professional experiences.\n\nCommunication skills are particularly important for entrepreneurial leaders. They must be able to pitch ideas to investors, negotiate with partners, and motivate employees. This requires both verbal and written communication abilities, as well as active listening skills.\n\nBuilding a strong organizational culture from the early stages of a business is essential for long-term success. This involves establishing values, processes, and systems that support growth and innovation.",
    },
    Topic {
        keywords: &["market", "customer", "research"],
        body: "Market research is fundamental to entrepreneurial success. Understanding your target market, customer needs, and competitive landscape provides the foundation for making informed business decisions and developing effective strategies.\n\nComprehensive market research involves multiple approaches:\n\u{2022} Primary research: Direct interaction with potential customers through surveys, interviews, and focus groups\n\u{2022} Secondary research: Analysis of existing data, industry reports, and market trends\n\u{2022} Competitive analysis: Understanding what competitors offer and identifying market gaps\n\u{2022} Customer personas: Creating detailed profiles of ideal customers\n\nThe digital age has transformed how entrepreneurs conduct market research. Online tools, social media analytics, and e-commerce platforms provide unprecedented access to customer data and behavior patterns. This information can be used to refine products, improve marketing strategies, and identify new opportunities.\n\nUnderstanding market dynamics is equally important. This includes recognizing seasonal trends, economic factors, and technological changes that might impact your business. Successful entrepreneurs continuously monitor these factors and adjust their strategies accordingly.\n\nCustomer validation is a critical component of market research. Before investing significant resources in product development, entrepreneurs should test their assumptions with real customers. This iterative process helps ensure that the final product meets market needs and has commercial viability.\n\nModern market research also emphasizes the importance of data privacy and ethical considerations. Entrepreneurs must balance the need for customer insights with respect for privacy and compliance with regulations.",
    },
];

static IMAGE_NOTES: &[&str] = &[
    "This image appears to show business professionals or entrepreneurs in a collaborative setting. It suggests themes of teamwork, innovation, and strategic planning that are relevant to entrepreneurship education.",
    "The image depicts elements related to business growth, market analysis, or startup culture. These visual cues can inspire content about scaling businesses, market research, or entrepreneurial mindset.",
    "This visual content relates to business innovation, technology adoption, or entrepreneurial success stories. It provides context for discussing modern business practices and digital transformation.",
    "The image shows aspects of business development, customer engagement, or entrepreneurial challenges. These elements can frame discussions about building sustainable businesses and creating customer value.",
];

/// Picks a topic by keyword match against the headline and expands it into a
/// full article with fixed closing sections. Stands in for a remote text
/// model behind the same trait.
#[derive(Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    fn select_topic(headline: &str) -> &'static Topic {
        let headline = headline.to_lowercase();
        TOPICS
            .iter()
            .find(|topic| topic.keywords.iter().any(|kw| headline.contains(kw)))
            .unwrap_or(&TOPICS[0])
    }

    fn describe_image() -> &'static str {
        let index = rand::thread_rng().gen_range(0..IMAGE_NOTES.len());
        IMAGE_NOTES[index]
    }
}

/// Truncate on a character boundary; byte slicing could split a multi-byte
/// character and panic.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn generate(
        &self,
        headline: &str,
        image: Option<&[u8]>,
    ) -> Result<GeneratedContent, GeneratorError> {
        if headline.trim().is_empty() {
            return Err(GeneratorError::Failed("headline is empty".to_string()));
        }

        let topic = Self::select_topic(headline);

        let mut content = format!("# {}\n\n{}\n\n", headline, topic.body);

        if image.is_some() {
            content.push_str(&format!("## About the Featured Image\n\n{}\n\n", Self::describe_image()));
        }

        content.push_str(
            "## Practical Applications\n\n\
             Understanding these concepts is essential for aspiring entrepreneurs. The Centre of \
             Entrepreneurship provides resources and support to help individuals navigate the \
             complex world of business creation and innovation.\n\n\
             ## Key Takeaways\n\n\
             \u{2022} Research and planning are fundamental to success\n\
             \u{2022} Building strong relationships with customers and stakeholders is crucial\n\
             \u{2022} Continuous learning and adaptation are necessary in today's business environment\n\
             \u{2022} Sustainable practices contribute to long-term success\n\
             \u{2022} Technology can be leveraged to create competitive advantages\n\n\
             ## Conclusion\n\n\
             The entrepreneurial journey requires dedication, strategic thinking, and continuous \
             learning. By applying these principles and staying informed about industry trends, \
             entrepreneurs can build successful, sustainable businesses that create value for \
             customers and society.\n\n\
             Remember that entrepreneurship is not just about starting a business\u{2014}it's about \
             creating solutions that make a positive impact on the world while building \
             sustainable economic value.",
        );

        let excerpt = truncate_chars(
            &format!(
                "Explore essential insights about {} and discover key strategies for entrepreneurial success in today's business landscape.",
                headline.to_lowercase()
            ),
            EXCERPT_MAX_LEN,
        );

        Ok(GeneratedContent { content, excerpt })
    }
}
