mod api_analytics;
